//! Client for the Riot Games web API family
//!
//! This crate resolves method keys such as `SUMMONER.GET_BY_SUMMONER_NAME`
//! against a registry of path templates, builds the request URL for a region,
//! serves repeat calls from an optional response cache and pushes everything
//! else through a rate-limited scheduler.
//!
//! # Example
//!
//! ```no_run
//! use rift_api::registry::methods;
//! use rift_api::{ClientConfig, PathParams, Region, RequestOptions, RiotApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = RiotApi::new("RGAPI-00000000", ClientConfig::from_env()?)?;
//!
//!     let summoner: serde_json::Value = api
//!         .request(
//!             Region::Euw1,
//!             methods::summoner::GET_BY_SUMMONER_NAME,
//!             &PathParams::new().with("summonerName", "Demos"),
//!             RequestOptions::default(),
//!         )
//!         .await?;
//!     println!("{summoner}");
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod ddragon;
pub mod dto;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod region;
pub mod registry;
pub mod retry;
pub mod transport;
pub mod url_builder;

pub use cache::{CacheBackend, CacheStats, MemoryCache, RedisCache, ResponseCache};
pub use client::{RequestOptions, RiotApi};
pub use config::{CacheConfig, ClientConfig};
pub use ddragon::{DDragon, Locale, Realm};
pub use endpoints::MatchIdsQuery;
pub use error::{ApiError, Result};
pub use executor::{
    Datastore, JobDescriptor, QuotaWindow, RateLimitConfig, RateLimitedExecutor, RateLimiter,
    RequestDescriptor, Scheduler,
};
pub use region::Region;
pub use registry::MethodRegistry;
pub use retry::RetryPolicy;
pub use transport::{HttpClient, HttpConfig};
pub use url_builder::{PathParams, QueryParams, QueryValue, UrlBuilder};

pub use reqwest::{Method, StatusCode};
