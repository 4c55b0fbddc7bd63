pub mod api_types;
mod cache;
pub mod client;
pub mod envelope;
pub mod types;

pub use client::{ApiClient, ClientError};
