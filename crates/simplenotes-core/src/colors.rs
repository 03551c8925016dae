use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteColor {
    #[default]
    Green,
    Blue,
    Red,
    Yellow,
}

impl NoteColor {
    pub const ALL: [NoteColor; 4] = [
        NoteColor::Green,
        NoteColor::Blue,
        NoteColor::Red,
        NoteColor::Yellow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NoteColor::Green => "Green",
            NoteColor::Blue => "Blue",
            NoteColor::Red => "Red",
            NoteColor::Yellow => "Yellow",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            NoteColor::Green => "#81C784",
            NoteColor::Blue => "#64B5F6",
            NoteColor::Red => "#E57373",
            NoteColor::Yellow => "#FFF176",
        }
    }

    /// Softer variant used behind note cards.
    pub fn background_hex(&self) -> &'static str {
        match self {
            NoteColor::Green => "#E8F5E8",
            NoteColor::Blue => "#E3F2FD",
            NoteColor::Red => "#FFEBEE",
            NoteColor::Yellow => "#FFFDE7",
        }
    }

    /// Looks up a stored color token, falling back to the default for
    /// anything unrecognized.
    pub fn resolve(token: &str) -> NoteColor {
        token.parse().unwrap_or_default()
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color `{}`", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for NoteColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteColor::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightColor {
    #[default]
    Yellow,
    Green,
    Blue,
    Pink,
    Orange,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 5] = [
        HighlightColor::Yellow,
        HighlightColor::Green,
        HighlightColor::Blue,
        HighlightColor::Pink,
        HighlightColor::Orange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "Yellow",
            HighlightColor::Green => "Green",
            HighlightColor::Blue => "Blue",
            HighlightColor::Pink => "Pink",
            HighlightColor::Orange => "Orange",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "#FFEB3B",
            HighlightColor::Green => "#4CAF50",
            HighlightColor::Blue => "#2196F3",
            HighlightColor::Pink => "#E91E63",
            HighlightColor::Orange => "#FF9800",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for HighlightColor {
    type Err = UnknownColor;

    // Older rows stored upper-case tokens (`YELLOW`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HighlightColor::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}
