//! Character ramps for each density tier
//!
//! Every ramp runs from the darkest-mapped glyph at index 0 to the lightest
//! (a space) at the last index. Luminance 0.0 selects index 0.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fine ramp, `%` ranked denser than `#`
pub const FINE_CHARS: [char; 10] = ['@', '%', '#', '*', '+', '=', '-', ':', '.', ' '];

/// Medium ramp
pub const MEDIUM_CHARS: [char; 10] = ['@', '#', '%', '*', '+', '=', '-', ':', '.', ' '];

/// Coarse ramp, currently the same glyph order as medium
pub const COARSE_CHARS: [char; 10] = ['@', '#', '%', '*', '+', '=', '-', ':', '.', ' '];

/// Density tier selecting one of the built-in ramps
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Fine,
    #[default]
    Medium,
    Coarse,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::Fine, Density::Medium, Density::Coarse];

    /// The ramp used for this tier
    pub fn palette(self) -> Palette {
        match self {
            Density::Fine => Palette(&FINE_CHARS),
            Density::Medium => Palette(&MEDIUM_CHARS),
            Density::Coarse => Palette(&COARSE_CHARS),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Density::Fine => "fine",
            Density::Medium => "medium",
            Density::Coarse => "coarse",
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Density {
    type Err = ConfigError;

    /// Case-insensitive; unknown names are rejected rather than mapped to medium.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Density::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownDensity(s.to_string()))
    }
}

/// An ordered glyph ramp, darkest-mapped first
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette(&'static [char]);

impl Palette {
    pub fn chars(&self) -> &'static [char] {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest valid index
    pub fn max_index(&self) -> usize {
        self.0.len() - 1
    }

    /// Glyph at `index`, clamped into the ramp
    pub fn get(&self, index: usize) -> char {
        self.0[index.min(self.max_index())]
    }

    /// Substitute glyph for pixels whose mapping failed
    pub fn middle(&self) -> char {
        self.0[self.0.len() / 2]
    }

    pub fn contains(&self, ch: char) -> bool {
        self.0.contains(&ch)
    }
}
