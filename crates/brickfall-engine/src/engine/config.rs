use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::{difficulty::Difficulty, shape_source::ShapeSeed};

/// Minimum time between two accepted horizontal moves, unless configured.
pub const DEFAULT_MOVE_REPEAT_DELAY: Duration = Duration::from_millis(30);

/// Upper bound on the configurable move repeat delay.
pub const MAX_MOVE_REPEAT_DELAY: Duration = Duration::from_secs(1);

/// Settings fixed at engine construction.
///
/// Deserializes from JSON with every field optional; durations are whole
/// milliseconds.
///
/// ```
/// use std::time::Duration;
/// use brickfall_engine::{Difficulty, EngineConfig};
///
/// let config: EngineConfig =
///     serde_json::from_str(r#"{ "difficulty": "hard", "move_repeat_delay_ms": 50 }"#).unwrap();
/// assert_eq!(config.difficulty, Difficulty::Hard);
/// assert_eq!(config.move_repeat_delay, Duration::from_millis(50));
/// assert!(config.seed.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Seed for the random shape source; a fresh one is drawn when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<ShapeSeed>,
    /// Minimum engine time between accepted horizontal moves. Zero disables
    /// the limit.
    #[serde(rename = "move_repeat_delay_ms", with = "super::serde_millis")]
    pub move_repeat_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            seed: None,
            move_repeat_delay: DEFAULT_MOVE_REPEAT_DELAY,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(self, seed: ShapeSeed) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    #[must_use]
    pub fn with_move_repeat_delay(self, delay: Duration) -> Self {
        Self {
            move_repeat_delay: delay,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_repeat_delay > MAX_MOVE_REPEAT_DELAY {
            return Err(ConfigError::MoveRepeatDelayTooLong {
                max_ms: MAX_MOVE_REPEAT_DELAY.as_millis(),
                got_ms: self.move_repeat_delay.as_millis(),
            });
        }
        Ok(())
    }
}
