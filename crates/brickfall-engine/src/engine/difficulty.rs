use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::ParseDifficultyError;

/// Difficulty tier chosen at start; selects the base fall interval.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[display("easy")]
    Easy,
    #[default]
    #[display("medium")]
    Medium,
    #[display("hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Time for the piece to fall one row at level 1 without soft drop.
    ///
    /// | Tier | Interval |
    /// |------|----------|
    /// | easy | 500ms |
    /// | medium | 300ms |
    /// | hard | 150ms |
    #[must_use]
    pub const fn base_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(500),
            Difficulty::Medium => Duration::from_millis(300),
            Difficulty::Hard => Duration::from_millis(150),
        }
    }
}

/// Case-insensitive; unknown names are an error rather than a silent default.
///
/// # Examples
///
/// ```
/// use brickfall_engine::Difficulty;
///
/// assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
/// assert!("nightmare".parse::<Difficulty>().is_err());
/// ```
impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDifficultyError::new(s))
    }
}
