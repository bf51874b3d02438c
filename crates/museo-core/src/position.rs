//! # Floor Positions
//!
//! The enumerated placement of an exposition within the museum. Wire-level
//! integers (`-1..=4`) are parsed into [`FloorPosition`] at the API boundary;
//! any other integer is undefined and must surface as not-found to every
//! viewer, admin or not.

use serde::{Deserialize, Serialize};

/// Placement of an exposition: a public floor, the storage reserve,
/// the unassigned pool, or another museum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPosition {
    /// Not yet placed anywhere (wire level `-1`, the conceptual default).
    Unassigned,
    /// The museum storage reserve (wire level `0`).
    Storage,
    /// First public floor (wire level `1`).
    Floor1,
    /// Second public floor (wire level `2`).
    Floor2,
    /// Third public floor (wire level `3`).
    Floor3,
    /// On loan to another museum (wire level `4`).
    OtherMuseum,
}

impl FloorPosition {
    /// All defined positions, in wire-level order.
    pub const ALL: [Self; 6] = [
        Self::Unassigned,
        Self::Storage,
        Self::Floor1,
        Self::Floor2,
        Self::Floor3,
        Self::OtherMuseum,
    ];

    /// Parse a wire-level integer into a position.
    ///
    /// Returns `None` for any level outside `-1..=4` — undefined floors do
    /// not exist for any viewer.
    pub fn from_level(level: i16) -> Option<Self> {
        match level {
            -1 => Some(Self::Unassigned),
            0 => Some(Self::Storage),
            1 => Some(Self::Floor1),
            2 => Some(Self::Floor2),
            3 => Some(Self::Floor3),
            4 => Some(Self::OtherMuseum),
            _ => None,
        }
    }

    /// The wire-level integer for this position.
    pub fn level(self) -> i16 {
        match self {
            Self::Unassigned => -1,
            Self::Storage => 0,
            Self::Floor1 => 1,
            Self::Floor2 => 2,
            Self::Floor3 => 3,
            Self::OtherMuseum => 4,
        }
    }

    /// Machine-readable name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Storage => "storage",
            Self::Floor1 => "floor1",
            Self::Floor2 => "floor2",
            Self::Floor3 => "floor3",
            Self::OtherMuseum => "other_museum",
        }
    }

    /// Human-readable display name for listings.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Unassigned => "Unassigned",
            Self::Storage => "Storage reserve",
            Self::Floor1 => "First floor",
            Self::Floor2 => "Second floor",
            Self::Floor3 => "Third floor",
            Self::OtherMuseum => "Other museum",
        }
    }

    /// Whether this position is visible only to admins.
    ///
    /// The unassigned pool and the storage reserve exist but are hidden from
    /// regular visitors; the public floors and the other-museum listing are
    /// visible to any authenticated viewer.
    pub fn admin_only(self) -> bool {
        matches!(self, Self::Unassigned | Self::Storage)
    }
}

impl std::fmt::Display for FloorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_level_roundtrips_all_defined_positions() {
        for position in FloorPosition::ALL {
            assert_eq!(FloorPosition::from_level(position.level()), Some(position));
        }
    }

    #[test]
    fn undefined_levels_do_not_parse() {
        for level in [-2, 5, 6, 42, i16::MIN, i16::MAX] {
            assert_eq!(FloorPosition::from_level(level), None);
        }
    }

    #[test]
    fn admin_only_positions() {
        assert!(FloorPosition::Unassigned.admin_only());
        assert!(FloorPosition::Storage.admin_only());
        assert!(!FloorPosition::Floor1.admin_only());
        assert!(!FloorPosition::Floor2.admin_only());
        assert!(!FloorPosition::Floor3.admin_only());
        assert!(!FloorPosition::OtherMuseum.admin_only());
    }

    #[test]
    fn serde_representation_matches_as_str() {
        for position in FloorPosition::ALL {
            let json = serde_json::to_string(&position).unwrap();
            assert_eq!(json, format!("\"{}\"", position.as_str()));
        }
    }
}
