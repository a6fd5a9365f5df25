use std::collections::HashMap;
use serde::{Serialize, Deserialize};

use crate::parser::Player;

/// The ten fielding position ids, in scorekeeping order.
pub const FIELDING_POSITIONS: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Number of innings in a regulation game.
pub const DEFAULT_NUM_INNINGS: usize = 9;

/// Minimum number of girls that must be on the field every inning.
pub const DEFAULT_MIN_GIRLS_ON_FIELD: usize = 4;

/// Cell value used for a batter who is not fielding that inning.
pub const BENCH: &str = "Bench";

/// Converts a position id (1-10) to its scorecard abbreviation
pub fn position_name(position: u8) -> Option<&'static str> {
    match position {
        1 => Some("P"),
        2 => Some("C"),
        3 => Some("1B"),
        4 => Some("2B"),
        5 => Some("3B"),
        6 => Some("SS"),
        7 => Some("LF"),
        8 => Some("CF"),
        9 => Some("RF"),
        10 => Some("RV"),
        _ => None,
    }
}

/// Converts a scorecard abbreviation back to its position id
pub fn position_id(abbreviation: &str) -> Option<u8> {
    match abbreviation {
        "P" => Some(1),
        "C" => Some(2),
        "1B" => Some(3),
        "2B" => Some(4),
        "3B" => Some(5),
        "SS" => Some(6),
        "LF" => Some(7),
        "CF" => Some(8),
        "RF" => Some(9),
        "RV" => Some(10),
        _ => None,
    }
}

/// One inning's complete position-to-player mapping, fixed once solved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldingAssignment {
    pub positions: HashMap<u8, Player>, // position id -> player
    pub objective: f64,
}

impl FieldingAssignment {
    /// Returns the position id the named player holds this inning, if any
    pub fn position_of(&self, name: &str) -> Option<u8> {
        self.positions
            .iter()
            .find(|(_, player)| player.name == name)
            .map(|(position, _)| *position)
    }
}

/// The batting order for one game, fixed once solved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattingOrder {
    pub players: Vec<Player>, // index 0 bats first
    pub objective: f64,
}

/// Everything one optimization run produces for a game date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSchedule {
    pub game_date: String,
    pub batting: BattingOrder,
    pub innings: Vec<FieldingAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_names_round_trip() {
        for position in FIELDING_POSITIONS {
            let abbreviation = position_name(position).unwrap();
            assert_eq!(position_id(abbreviation), Some(position));
        }
        assert_eq!(position_name(11), None);
        assert_eq!(position_id("DH"), None);
    }
}
