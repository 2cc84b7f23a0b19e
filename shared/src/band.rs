use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub const HIGH_THRESHOLD: f64 = 70.0;
pub const MEDIUM_THRESHOLD: f64 = 40.0;

/// Visual tier of a confidence percentage. The string form is the CSS class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: f64) -> Self {
        if confidence >= HIGH_THRESHOLD {
            ConfidenceBand::High
        } else if confidence >= MEDIUM_THRESHOLD {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn css_class(&self) -> &str {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn boundaries() {
        assert_eq!(ConfidenceBand::of(39.9), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::of(40.0), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(40.1), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(69.9), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(70.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(70.1), ConfidenceBand::High);
    }

    #[test]
    fn extremes() {
        assert_eq!(ConfidenceBand::of(0.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::of(-5.0), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::of(100.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(f64::NAN), ConfidenceBand::Low);
    }

    #[test]
    fn class_names() {
        assert_eq!(ConfidenceBand::High.css_class(), "high");
        assert_eq!(ConfidenceBand::Medium.to_string(), "medium");
        assert_eq!(ConfidenceBand::from_str("low").unwrap(), ConfidenceBand::Low);
    }
}
