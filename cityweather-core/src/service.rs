use std::sync::Arc;

use crate::{
    error::{QueryError, TransportError},
    model::{CityQuery, CurrentConditions, ForecastSet, QueryResult},
    provider::{ProviderReply, WeatherProvider},
};

/// Turns a free-text city name into current conditions plus a daily forecast.
///
/// Holds no mutable state; clones share the provider.
#[derive(Debug, Clone)]
pub struct WeatherQueryService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherQueryService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Fetches current conditions and the forecast concurrently, waits for both,
    /// then decides. A failure status on either reply fails the whole query.
    pub async fn query(&self, city_name: &str) -> Result<QueryResult, QueryError> {
        let city = CityQuery::parse(city_name)?;

        let (current, forecast) =
            tokio::join!(self.provider.current(&city), self.provider.forecast(&city));

        let (current, samples) = match (current, forecast) {
            (Ok(ProviderReply::Failure { code, .. }), _)
            | (_, Ok(ProviderReply::Failure { code, .. })) => {
                tracing::info!(city = %city, code, "provider rejected query");
                return Err(QueryError::CityNotFound);
            }
            (Err(err), _) | (_, Err(err)) => return Err(transport_failure(&city, err)),
            (Ok(ProviderReply::Success(current)), Ok(ProviderReply::Success(samples))) => {
                (current, samples)
            }
        };

        Ok(QueryResult {
            current,
            forecast: ForecastSet::from_samples(samples),
        })
    }

    /// Current conditions only; the forecast endpoint is not contacted.
    pub async fn query_current(&self, city_name: &str) -> Result<CurrentConditions, QueryError> {
        let city = CityQuery::parse(city_name)?;

        match self.provider.current(&city).await {
            Ok(ProviderReply::Success(current)) => Ok(current),
            Ok(ProviderReply::Failure { code, .. }) => {
                tracing::info!(city = %city, code, "provider rejected query");
                Err(QueryError::CityNotFound)
            }
            Err(err) => Err(transport_failure(&city, err)),
        }
    }
}

fn transport_failure(city: &CityQuery, err: TransportError) -> QueryError {
    tracing::warn!(city = %city, error = %err, "weather query failed");
    QueryError::TransportFailure(err)
}
