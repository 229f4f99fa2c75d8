//! Position normalization.
//!
//! Maps the many platform-specific position codes (MFL's `TMWR`, ESPN's
//! `D/ST`, `PK` for kickers, IDP codes like `ILB`) onto a canonical position
//! set. Unknown codes pass through unchanged so unmapped platform data is
//! never lost.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical player position.
///
/// Parsing accepts a large synonym table; anything outside it is preserved
/// as [`Position::Other`] with its uppercased code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    /// Quarterback
    Qb,
    /// Running back
    Rb,
    /// Wide receiver
    Wr,
    /// Tight end
    Te,
    /// Kicker
    K,
    /// Team defense / special teams
    Def,
    /// Defensive line (DT, DE, NT)
    Dl,
    /// Linebacker (ILB, OLB)
    Lb,
    /// Defensive back (CB, S, FS, SS)
    Db,
    /// Offensive line (C, G, T)
    Ol,
    /// Punter
    P,
    /// Long snapper
    Ls,
    /// Fullback
    Fb,
    /// Bench slot
    Bn,
    /// Injured reserve slot
    Ir,
    /// Practice squad
    Practice,
    /// Taxi squad
    Taxi,
    /// Unmapped position code, preserved uppercased
    Other(String),
}

impl Position {
    /// Parses a raw platform-supplied position code.
    ///
    /// Compound positions (`"RB/WR"`) resolve to the first listed position.
    /// Empty input maps to `Other("UNKNOWN")`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            return Self::Other("UNKNOWN".to_string());
        }

        // Whole-string synonyms first: "D/ST" is a single code, not a compound.
        if let Some(pos) = Self::from_code(&code) {
            return pos;
        }

        if let Some(primary) = code.split('/').next() {
            let primary = primary.trim();
            if !primary.is_empty() && primary != code {
                if let Some(pos) = Self::from_code(primary) {
                    return pos;
                }
                return Self::Other(primary.to_string());
            }
        }

        Self::Other(code)
    }

    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "QB" => Self::Qb,
            "RB" | "HB" | "TB" => Self::Rb,
            "WR" => Self::Wr,
            "TE" => Self::Te,
            // PK is the MFL place-kicker code, H the holder.
            "K" | "PK" => Self::K,
            "DEF" | "D/ST" | "DST" | "D" | "TMWR" | "TEAM" => Self::Def,
            "DL" | "DT" | "DE" | "NT" => Self::Dl,
            "LB" | "ILB" | "OLB" => Self::Lb,
            "DB" | "CB" | "S" | "FS" | "SS" => Self::Db,
            "OL" | "C" | "G" | "T" | "OT" | "OG" => Self::Ol,
            "P" | "H" => Self::P,
            "LS" => Self::Ls,
            "FB" => Self::Fb,
            "BN" | "BENCH" => Self::Bn,
            "IR" | "RESERVE" | "INJURED" => Self::Ir,
            "PRACTICE" => Self::Practice,
            "TAXI" => Self::Taxi,
            _ => return None,
        })
    }

    /// Canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Wr => "WR",
            Self::Te => "TE",
            Self::K => "K",
            Self::Def => "DEF",
            Self::Dl => "DL",
            Self::Lb => "LB",
            Self::Db => "DB",
            Self::Ol => "OL",
            Self::P => "P",
            Self::Ls => "LS",
            Self::Fb => "FB",
            Self::Bn => "BN",
            Self::Ir => "IR",
            Self::Practice => "PRACTICE",
            Self::Taxi => "TAXI",
            Self::Other(code) => code,
        }
    }

    /// Returns true for positions that typically fill a starting lineup slot.
    #[must_use]
    pub const fn is_starter(&self) -> bool {
        matches!(
            self,
            Self::Qb | Self::Rb | Self::Wr | Self::Te | Self::K | Self::Def
        )
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("position cannot be empty".to_string());
        }
        Ok(Self::parse(&value))
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
