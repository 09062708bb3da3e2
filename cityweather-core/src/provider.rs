use crate::{
    CityQuery, Config,
    error::TransportError,
    model::{CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A decoded provider reply. `Failure` carries the provider's own status
/// indicator, e.g. 404 for an unknown city or 401 for a bad key.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply<T> {
    Success(T),
    Failure { code: u16, message: Option<String> },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`, in metric units.
    async fn current(
        &self,
        city: &CityQuery,
    ) -> Result<ProviderReply<CurrentConditions>, TransportError>;

    /// Raw forecast samples for `city`, in metric units, in provider order.
    async fn forecast(
        &self,
        city: &CityQuery,
    ) -> Result<ProviderReply<Vec<ForecastEntry>>, TransportError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenWeatherProvider::from_config(config)?))
}
