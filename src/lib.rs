pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
pub mod types;

pub use api::{QueryDeskApi, QueryDeskClient};
pub use error::{Diagnostic, Diagnostics, QueryDeskError};
pub use provider::QueryDeskProvider;
