//! Error types and handling for the Routecast library

use thiserror::Error;

/// Main error type for the Routecast library
#[derive(Error, Debug)]
pub enum RoutecastError {
    /// Neither forward geocoding result yielded a coordinate
    #[error("Location not found: {place}")]
    LocationNotFound { place: String },

    /// Every configured routing provider failed
    #[error("No routing provider could resolve a route from '{origin}' to '{destination}'")]
    RouteUnavailable { origin: String, destination: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RoutecastError {
    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(place: S) -> Self {
        Self::LocationNotFound {
            place: place.into(),
        }
    }

    /// Create a new route-unavailable error
    pub fn route_unavailable<S: Into<String>>(origin: S, destination: S) -> Self {
        Self::RouteUnavailable {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RoutecastError::LocationNotFound { place } => {
                format!("Could not find a location matching '{place}'. Try a more specific name.")
            }
            RoutecastError::RouteUnavailable { .. } => {
                "No driving route could be resolved between these locations.".to_string()
            }
            RoutecastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            RoutecastError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            RoutecastError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            RoutecastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
