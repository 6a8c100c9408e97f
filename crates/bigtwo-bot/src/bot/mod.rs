mod legal;

pub use legal::legal_plays;

use core::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opponents holding this many cards or fewer are about to go out.
pub const DANGER_CARDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotStyle {
    /// Sheds the weakest legal hand and holds bombs until someone is close to
    /// going out or its own total nears the target.
    #[default]
    Cautious,
    /// Leads with its largest combinations and bombs whenever it cannot follow.
    Aggressive,
}

impl BotStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            BotStyle::Cautious => "cautious",
            BotStyle::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for BotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bot style '{0}' (expected cautious or aggressive)")]
pub struct UnknownStyle(pub String);

impl FromStr for BotStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cautious" => Ok(BotStyle::Cautious),
            "aggressive" => Ok(BotStyle::Aggressive),
            other => Err(UnknownStyle(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BotStyle;

    #[test]
    fn parses_style_names_case_insensitively() {
        assert_eq!("Cautious".parse::<BotStyle>(), Ok(BotStyle::Cautious));
        assert_eq!(" aggressive ".parse::<BotStyle>(), Ok(BotStyle::Aggressive));
        let err = "reckless".parse::<BotStyle>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown bot style 'reckless' (expected cautious or aggressive)"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
        assert_eq!(BotStyle::default(), BotStyle::Cautious);
    }
}
