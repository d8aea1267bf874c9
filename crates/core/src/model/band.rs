use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── BAND ──────────────────────────────────────────────────────────────────────
//

/// Difficulty tier of an item.
///
/// Each band carries a fixed IRT difficulty parameter used by the ability
/// estimator and a default response-time profile used by the fatigue model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Easy, Band::Medium, Band::Hard];

    /// Item difficulty on the logit scale.
    #[must_use]
    pub fn difficulty(self) -> f64 {
        match self {
            Band::Easy => -1.5,
            Band::Medium => 0.0,
            Band::Hard => 1.0,
        }
    }

    /// Expected answer time for items of this band.
    #[must_use]
    pub fn expected_time(self) -> TimeProfile {
        match self {
            Band::Easy => TimeProfile::new(18.0, 6.0),
            Band::Medium => TimeProfile::new(22.0, 6.0),
            Band::Hard => TimeProfile::new(28.0, 8.0),
        }
    }

    /// Single-letter code used in item ids.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Band::Easy => 'E',
            Band::Medium => 'M',
            Band::Hard => 'H',
        }
    }

    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'E' => Some(Band::Easy),
            'M' => Some(Band::Medium),
            'H' => Some(Band::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Band::Easy => "easy",
            Band::Medium => "medium",
            Band::Hard => "hard",
        };
        f.write_str(label)
    }
}

//
// ─── TIME PROFILE ──────────────────────────────────────────────────────────────
//

/// Mean and standard deviation of the time (seconds) an item is expected to take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeProfile {
    pub mean_secs: f64,
    pub stdev_secs: f64,
}

impl TimeProfile {
    #[must_use]
    pub fn new(mean_secs: f64, stdev_secs: f64) -> Self {
        Self {
            mean_secs,
            stdev_secs,
        }
    }

    /// Standardised distance of `elapsed_secs` from the mean.
    ///
    /// The deviation is floored at one second so near-zero spreads cannot blow up.
    #[must_use]
    pub fn z_score(&self, elapsed_secs: f64) -> f64 {
        (elapsed_secs - self.mean_secs) / self.stdev_secs.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for band in Band::ALL {
            assert_eq!(Band::from_code(band.code()), Some(band));
        }
        assert_eq!(Band::from_code('X'), None);
    }

    #[test]
    fn difficulty_parameters_are_fixed() {
        assert_eq!(Band::Easy.difficulty(), -1.5);
        assert_eq!(Band::Medium.difficulty(), 0.0);
        assert_eq!(Band::Hard.difficulty(), 1.0);
    }

    #[test]
    fn z_score_floors_stdev() {
        let profile = TimeProfile::new(10.0, 0.2);
        assert_eq!(profile.z_score(13.0), 3.0);
        assert_eq!(Band::Hard.expected_time().z_score(36.0), 1.0);
    }
}
