// Roster positions and the role weights applied to each player group.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positions a rostered player can be listed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    FirstBase,
    SecondBase,
    ShortStop,
    ThirdBase,
    Catcher,
    DesignatedHitter,
    Outfield,
    Pitcher,
}

impl Position {
    /// Every hitting position, in lineup display order.
    pub const HITTING: [Position; 7] = [
        Position::FirstBase,
        Position::SecondBase,
        Position::ShortStop,
        Position::ThirdBase,
        Position::Catcher,
        Position::DesignatedHitter,
        Position::Outfield,
    ];

    /// Parse a position abbreviation ("1B", "of", "P", ...).
    ///
    /// The generic outfield slot also accepts "LF"/"CF"/"RF" since the
    /// league does not distinguish outfield spots.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "SS" => Some(Position::ShortStop),
            "3B" => Some(Position::ThirdBase),
            "C" => Some(Position::Catcher),
            "DH" => Some(Position::DesignatedHitter),
            "OF" | "LF" | "CF" | "RF" => Some(Position::Outfield),
            "P" | "SP" | "RP" => Some(Position::Pitcher),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ShortStop => "SS",
            Position::ThirdBase => "3B",
            Position::Catcher => "C",
            Position::DesignatedHitter => "DH",
            Position::Outfield => "OF",
            Position::Pitcher => "P",
        }
    }

    pub fn is_hitter(&self) -> bool {
        !matches!(self, Position::Pitcher)
    }

    /// How many starters the lineup carries at this position.
    pub fn starter_slots(&self) -> usize {
        match self {
            Position::Outfield => 3,
            Position::Pitcher => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Which group a hitter counts toward, expressed as a percentage weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Starter,
    Bench,
    Minors,
}

impl Role {
    pub fn percent(&self) -> u32 {
        match self {
            Role::Starter => 100,
            Role::Bench => 50,
            Role::Minors => 0,
        }
    }

    /// Weight as a fraction of full value.
    pub fn weight(&self) -> f64 {
        f64::from(self.percent()) / 100.0
    }
}
