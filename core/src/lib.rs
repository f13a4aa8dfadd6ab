pub mod benchmark;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod eth_client;
pub mod eth_request;
pub mod metrics;
pub mod partition;
pub mod stats;
pub mod types;

pub use error::{Error, Result};
