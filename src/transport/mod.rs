//! Transport
//!
//! HTTP clients for the two tiers (self-hosted proxy and direct provider)
//! plus the health probe that gates the proxy.

pub mod direct;
pub mod health;
pub mod http;
pub mod proxy;
pub mod wire;

pub use direct::DirectClient;
pub use health::HealthProbe;
pub use proxy::ProxyClient;
pub use wire::{
    Blob, Content, GenerateContentRequest, GenerationConfig, HealthStatus, Part,
    ProxyStreamRequest,
};
