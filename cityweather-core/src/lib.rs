//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather provider (OpenWeatherMap)
//! - The city query service and its forecast normalization
//! - Shared domain models and the query error taxonomy
//!
//! It is used by `cityweather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod service;

pub use config::Config;
pub use error::{QueryError, TransportError};
pub use model::{CityQuery, CurrentConditions, ForecastEntry, ForecastSet, QueryResult};
pub use provider::{ProviderReply, WeatherProvider, openweather::OpenWeatherProvider};
pub use service::WeatherQueryService;
