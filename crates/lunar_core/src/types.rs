//! Identifier and value newtypes shared by snapshots and events.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, FromRepr};

/// Seat number of a player (1 or 2 in a valid game).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    /// First seat.
    pub const ONE: Self = Self(1);
    /// Second seat.
    pub const TWO: Self = Self(2);

    /// Wraps a raw seat number without validating it.
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// Raw seat number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns true for seat 1 or 2.
    pub const fn is_seat(self) -> bool {
        matches!(self.0, 1 | 2)
    }

    /// The other seat. Unknown seats map to themselves.
    pub const fn opponent(self) -> Self {
        match self.0 {
            1 => Self::TWO,
            2 => Self::ONE,
            other => Self(other),
        }
    }

    /// Header value the server uses to identify a viewer (`player1`, `player2`).
    pub fn header_value(self) -> String {
        format!("player{}", self.0)
    }
}

/// Name of a board node, e.g. `"n5"` or `"square-7"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrows the node name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Two nodes as the server sends them, e.g. `["n5", "n2"]`.
pub type NodePair = [NodeId; 2];

/// A moon-phase card value in `0..=7`.
///
/// Deserialization accepts any byte; out-of-range values are caught by
/// snapshot validation so a bad payload is rejected instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct PhaseValue(u8);

impl PhaseValue {
    /// Highest valid phase value.
    pub const MAX: u8 = 7;

    /// Creates a phase value, rejecting anything above [`PhaseValue::MAX`].
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// Raw value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns true when the value is a real phase.
    pub const fn is_valid(self) -> bool {
        self.0 <= Self::MAX
    }

    /// The named phase, if the value is in range.
    pub fn phase(self) -> Option<MoonPhase> {
        MoonPhase::from_repr(self.0)
    }
}

/// Named moon phases in card order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, FromRepr)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum MoonPhase {
    /// 0
    NewMoon = 0,
    /// 1
    WaxingCrescent = 1,
    /// 2
    FirstQuarter = 2,
    /// 3
    WaxingGibbous = 3,
    /// 4
    FullMoon = 4,
    /// 5
    WaningGibbous = 5,
    /// 6
    LastQuarter = 6,
    /// 7
    WaningCrescent = 7,
}

impl MoonPhase {
    /// Single-glyph rendering used by text surfaces.
    pub fn glyph(self) -> char {
        match self {
            MoonPhase::NewMoon => '🌑',
            MoonPhase::WaxingCrescent => '🌒',
            MoonPhase::FirstQuarter => '🌓',
            MoonPhase::WaxingGibbous => '🌔',
            MoonPhase::FullMoon => '🌕',
            MoonPhase::WaningGibbous => '🌖',
            MoonPhase::LastQuarter => '🌗',
            MoonPhase::WaningCrescent => '🌘',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_phase_value_range() {
        assert!(PhaseValue::new(0).is_some());
        assert!(PhaseValue::new(7).is_some());
        assert!(PhaseValue::new(8).is_none());
    }

    #[test]
    fn test_every_phase_has_a_value() {
        for (i, phase) in MoonPhase::iter().enumerate() {
            let value = PhaseValue::new(i as u8).unwrap();
            assert_eq!(value.phase(), Some(phase));
        }
        assert_eq!(MoonPhase::FullMoon.to_string(), "full_moon");
    }

    #[test]
    fn test_player_opponent() {
        assert_eq!(PlayerId::ONE.opponent(), PlayerId::TWO);
        assert_eq!(PlayerId::TWO.opponent(), PlayerId::ONE);
        assert!(!PlayerId::new(3).is_seat());
        assert_eq!(PlayerId::TWO.header_value(), "player2");
    }

    #[test]
    fn test_player_id_as_json_map_key() {
        let scores: std::collections::BTreeMap<PlayerId, u32> =
            serde_json::from_str(r#"{"1": 3, "2": 0}"#).unwrap();
        assert_eq!(scores.get(&PlayerId::ONE), Some(&3));
    }
}
