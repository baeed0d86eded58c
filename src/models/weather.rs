//! Weather observation model attached to checkpoints

use serde::{Deserialize, Serialize};

/// Weather at a single checkpoint.
///
/// `temperature_c` is `None` when the weather lookup for that
/// checkpoint failed; the rest of the forecast is still valid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Temperature in Celsius, absent when unavailable
    pub temperature_c: Option<f32>,
    /// Human-readable condition label
    pub condition: String,
}

impl WeatherObservation {
    #[must_use]
    pub fn new(temperature_c: f32, condition: impl Into<String>) -> Self {
        Self {
            temperature_c: Some(temperature_c),
            condition: condition.into(),
        }
    }

    /// Degraded observation used when the weather lookup fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            temperature_c: None,
            condition: crate::weather::condition_from_code(0),
        }
    }

    /// Format the temperature for display.
    #[must_use]
    pub fn format_temperature(&self) -> String {
        match self.temperature_c {
            Some(t) => format!("{t:.1}°C"),
            None => "unavailable".to_string(),
        }
    }
}
