use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub type PostId = i64;

/// Formatting variant used to render a stardate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum StardateStyle {
    /// `YYMM.DD`, year counted from 1900
    #[default]
    Classic,
    /// Year plus hundredths of a year
    XI,
    /// Year plus zero-padded day of the year
    XIWikipedia,
    SOL,
}

impl StardateStyle {
    pub const ALL: [StardateStyle; 4] = [
        StardateStyle::Classic,
        StardateStyle::XI,
        StardateStyle::XIWikipedia,
        StardateStyle::SOL,
    ];

    /// Reads a style the way the settings store does: unknown names become `Classic`
    pub fn from_setting(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StardateStyle::Classic => "Classic",
            StardateStyle::XI => "XI",
            StardateStyle::XIWikipedia => "XI_wikipedia",
            StardateStyle::SOL => "SOL",
        }
    }
}

impl FromStr for StardateStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(StardateStyle::Classic),
            "xi" => Ok(StardateStyle::XI),
            "xi_wikipedia" | "xi-wikipedia" => Ok(StardateStyle::XIWikipedia),
            "sol" => Ok(StardateStyle::SOL),
            _ => Err(Error::InvalidStyle(s.to_string())),
        }
    }
}

impl From<String> for StardateStyle {
    fn from(value: String) -> Self {
        StardateStyle::from_setting(&value)
    }
}

impl fmt::Display for StardateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix and style used for every calculation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StardateConfig {
    pub prefix: String,
    pub style: StardateStyle,
}

impl Default for StardateConfig {
    fn default() -> Self {
        Self {
            prefix: "Stardate".to_string(),
            style: StardateStyle::Classic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDateRecord {
    pub id: PostId,
    pub date: String, // Raw value from the content store, blank when the post has no date
}

impl PostDateRecord {
    pub fn new(id: PostId, date: impl Into<String>) -> Self {
        Self {
            id,
            date: date.into(),
        }
    }

    pub fn has_date(&self) -> bool {
        !self.date.trim().is_empty()
    }
}

/// Result of one sweep over the content store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkRunOutcome {
    pub succeeded: Vec<PostId>,
    pub failed: Vec<PostId>,
}

impl BulkRunOutcome {
    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    pub posts_cleared: usize,
    pub terms_deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse_known_names() {
        assert_eq!("Classic".parse::<StardateStyle>().unwrap(), StardateStyle::Classic);
        assert_eq!("XI".parse::<StardateStyle>().unwrap(), StardateStyle::XI);
        assert_eq!("XI_wikipedia".parse::<StardateStyle>().unwrap(), StardateStyle::XIWikipedia);
        assert_eq!("XI_Wikipedia".parse::<StardateStyle>().unwrap(), StardateStyle::XIWikipedia);
        assert_eq!("sol".parse::<StardateStyle>().unwrap(), StardateStyle::SOL);
    }

    #[test]
    fn test_style_parse_unknown_is_error() {
        let err = "TNG".parse::<StardateStyle>().unwrap_err();
        assert!(matches!(err, Error::InvalidStyle(ref s) if s == "TNG"));
    }

    #[test]
    fn test_style_from_setting_falls_back_to_classic() {
        assert_eq!(StardateStyle::from_setting("TNG"), StardateStyle::Classic);
        assert_eq!(StardateStyle::from_setting(""), StardateStyle::Classic);
        assert_eq!(StardateStyle::from_setting("SOL"), StardateStyle::SOL);
    }

    #[test]
    fn test_style_display_round_trips_through_parse() {
        for style in StardateStyle::ALL {
            assert_eq!(style.to_string().parse::<StardateStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = StardateConfig::default();
        assert_eq!(config.prefix, "Stardate");
        assert_eq!(config.style, StardateStyle::Classic);
    }

    #[test]
    fn test_post_record_has_date() {
        assert!(PostDateRecord::new(1, "2023-01-01").has_date());
        assert!(!PostDateRecord::new(2, "").has_date());
        assert!(!PostDateRecord::new(3, "   ").has_date());
    }

    #[test]
    fn test_outcome_processed_and_clean() {
        let outcome = BulkRunOutcome {
            succeeded: vec![1, 2],
            failed: vec![3],
        };
        assert_eq!(outcome.processed(), 3);
        assert!(!outcome.is_clean());
        assert!(BulkRunOutcome::default().is_clean());
    }
}
