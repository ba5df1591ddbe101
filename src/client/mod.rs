//! Client Module
//!
//! HTTP transport to the model provider.

pub mod http;

pub use http::ProviderClient;
