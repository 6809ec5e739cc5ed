// Application layer: CLI command dispatch on top of the client.

pub mod commands;
