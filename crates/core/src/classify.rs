use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative label for a final raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Classification {
    /// 10 and above is Excellent, 8-9 Good, 6-7 Average, anything lower Poor.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        match score {
            10.. => Self::Excellent,
            8..=9 => Self::Good,
            6..=7 => Self::Average,
            _ => Self::Poor,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_boundaries() {
        assert_eq!(Classification::from_score(10), Classification::Excellent);
        assert_eq!(Classification::from_score(9), Classification::Good);
        assert_eq!(Classification::from_score(8), Classification::Good);
        assert_eq!(Classification::from_score(7), Classification::Average);
        assert_eq!(Classification::from_score(6), Classification::Average);
        for score in 0..=5 {
            assert_eq!(Classification::from_score(score), Classification::Poor);
        }
    }

    #[test]
    fn labels_match_wire_names() {
        assert_eq!(Classification::Excellent.to_string(), "Excellent");
        assert_eq!(Classification::Poor.label(), "Poor");
    }
}
