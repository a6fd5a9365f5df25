pub mod types;
pub mod solver;
pub mod batting;
pub mod fielding;

pub use types::{BattingOrder, FieldingAssignment, GameSchedule};
pub use solver::LineupError;
pub use batting::create_batting_order;
pub use fielding::create_fielding_schedule;

use crate::parser::Player;

/// Runs both optimizations for one game date: the batting order first,
/// then the inning-by-inning fielding assignments
pub fn create_game_schedule(
    players: &[Player],
    game_date: &str,
    num_innings: usize,
    min_girls: usize,
) -> Result<GameSchedule, LineupError> {
    let batting = create_batting_order(players, game_date)?;
    let innings = create_fielding_schedule(players, game_date, num_innings, min_girls)?;
    Ok(GameSchedule {
        game_date: game_date.to_string(),
        batting,
        innings,
    })
}
