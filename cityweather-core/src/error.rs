use thiserror::Error;

/// Outcome classes of a weather query that the caller is expected to render.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The city name was empty after trimming. No request was made.
    #[error("empty city name")]
    EmptyQuery,

    /// At least one provider reply carried a non-success status.
    #[error("city not found")]
    CityNotFound,

    /// A request could not complete or its body was not decodable.
    #[error("weather provider request failed: {0}")]
    TransportFailure(#[from] TransportError),
}

impl QueryError {
    /// Short message suitable for end users. Transport details are never exposed here.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::EmptyQuery => "Please enter a city name",
            QueryError::CityNotFound => "City not found",
            QueryError::TransportFailure(_) => "Something went wrong",
        }
    }
}

/// Diagnostic detail behind [`QueryError::TransportFailure`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: {source} (body: {body})")]
    Decode {
        context: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_per_class() {
        assert_eq!(QueryError::EmptyQuery.user_message(), "Please enter a city name");
        assert_eq!(QueryError::CityNotFound.user_message(), "City not found");
    }

    #[test]
    fn transport_failure_hides_details_from_user() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = QueryError::from(TransportError::Decode {
            context: "Failed to parse OpenWeather current JSON",
            body: "<html>".to_string(),
            source,
        });

        assert_eq!(err.user_message(), "Something went wrong");
        assert!(err.to_string().contains("Failed to parse OpenWeather current JSON"));
    }
}
