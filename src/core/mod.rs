pub mod client;
pub mod http;
pub mod pagination;
pub mod resources;
pub mod url;

pub use crate::domain::model::Page;
pub use crate::domain::ports::HttpBackend;
pub use crate::utils::error::Result;
pub use client::{DefaultRawgClient, RawgClient};
