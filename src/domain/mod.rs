// Domain layer: RAWG payload models, query builders and the HTTP port.

pub mod model;
pub mod ports;
pub mod query;
