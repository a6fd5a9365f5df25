use good_lp::{constraint, default_solver, Expression, ProblemVariables, SolverModel};

use crate::parser::Player;
use super::solver::{assigned_pairs, binary_matrix, map_resolution_error, objective_value, LineupError};
use super::types::BattingOrder;

/// Batters per gender-balance window
const WINDOW_SIZE: usize = 5;

/// Minimum girls required in each full window of consecutive batting slots
const GIRLS_PER_WINDOW: usize = 2;

/// Builds and solves the batting-order assignment for one game date.
///
/// Earlier slots carry a higher weight, so the order front-loads the
/// better hitters. Every full window of five consecutive slots must hold
/// at least two girls; a trailing partial window is left unconstrained so
/// a roster that does not divide evenly stays solvable.
pub fn create_batting_order(players: &[Player], game_date: &str) -> Result<BattingOrder, LineupError> {
    let batters: Vec<&Player> = players.iter().filter(|p| p.attends(game_date)).collect();
    let num_batters = batters.len();
    if num_batters == 0 {
        return Err(LineupError::NoPlayers { date: game_date.to_string() });
    }

    let mut vars = ProblemVariables::new();
    let x = binary_matrix(&mut vars, num_batters, num_batters);

    // Maximize weighted skill, weight num_batters - j for slot j
    let objective: Expression = (0..num_batters)
        .flat_map(|i| {
            let x = &x;
            let skill = batters[i].batting_skill as f64;
            (0..num_batters).map(move |j| {
                let weight = (num_batters - j) as f64;
                skill * weight * x[i][j]
            })
        })
        .sum();

    let mut model = vars.maximise(objective.clone()).using(default_solver);

    // Each batter takes exactly one slot
    for i in 0..num_batters {
        let row: Expression = (0..num_batters).map(|j| Expression::from(x[i][j])).sum();
        model = model.with(constraint!(row == 1.0));
    }

    // Each slot holds exactly one batter
    for j in 0..num_batters {
        let column: Expression = (0..num_batters).map(|i| Expression::from(x[i][j])).sum();
        model = model.with(constraint!(column == 1.0));
    }

    // At least two girls in every full window of five consecutive slots
    let mut window_start = 0;
    while window_start + WINDOW_SIZE <= num_batters {
        let girls_in_window: Expression = (0..num_batters)
            .filter(|&i| batters[i].is_girl)
            .flat_map(|i| (0..WINDOW_SIZE).map(move |k| (i, window_start + k)))
            .map(|(i, j)| Expression::from(x[i][j]))
            .sum();
        model = model.with(constraint!(girls_in_window >= GIRLS_PER_WINDOW as f64));
        window_start += WINDOW_SIZE;
    }

    let solution = model
        .solve()
        .map_err(|e| map_resolution_error(e, "batting order"))?;

    // Decode: slot j is batted by the player whose x[i][j] is 1
    let mut order: Vec<Option<&Player>> = vec![None; num_batters];
    for (i, j) in assigned_pairs(&solution, &x) {
        order[j] = Some(batters[i]);
    }
    let players = order
        .into_iter()
        .map(|slot| {
            slot.cloned().ok_or_else(|| LineupError::SolverFailure {
                context: "batting order".to_string(),
                message: "solution left a batting slot unassigned".to_string(),
            })
        })
        .collect::<Result<Vec<Player>, LineupError>>()?;

    Ok(BattingOrder {
        players,
        objective: objective_value(objective, &solution),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::lineup::types::FIELDING_POSITIONS;

    fn make_player(name: &str, is_girl: bool, batting_skill: i64) -> Player {
        Player {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            is_girl,
            batting_skill,
            attendance: HashMap::from([("06/09".to_string(), true)]),
            possibilities: FIELDING_POSITIONS.iter().map(|&p| (p, true)).collect(),
        }
    }

    fn mixed_roster(total: usize, girls: usize) -> Vec<Player> {
        (0..total)
            .map(|i| {
                let skill = 100 * (total - i) as i64;
                make_player(&format!("player{i}"), i < girls, skill)
            })
            .collect()
    }

    #[test]
    fn test_order_is_a_bijection() {
        let players = mixed_roster(10, 4);
        let order = create_batting_order(&players, "06/09").unwrap();
        assert_eq!(order.players.len(), 10);
        let mut names: Vec<&str> = order.players.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_full_windows_hold_two_girls() {
        let players = mixed_roster(10, 4);
        let order = create_batting_order(&players, "06/09").unwrap();
        for window in order.players.chunks(5) {
            if window.len() == 5 {
                let girls = window.iter().filter(|p| p.is_girl).count();
                assert!(girls >= 2, "window has only {girls} girls");
            }
        }
    }

    #[test]
    fn test_trailing_partial_window_is_exempt() {
        // Seven batters, two girls: the 5..7 window cannot hold two girls
        // once both are placed in the first five slots, and must not need to
        let players = mixed_roster(7, 2);
        let order = create_batting_order(&players, "06/09").unwrap();
        assert_eq!(order.players.len(), 7);
        let girls_up_front = order.players[..5].iter().filter(|p| p.is_girl).count();
        assert!(girls_up_front >= 2);
    }

    #[test]
    fn test_gender_skewed_roster_is_reported_infeasible() {
        let players = mixed_roster(5, 1);
        let err = create_batting_order(&players, "06/09").unwrap_err();
        assert!(matches!(err, LineupError::Infeasible { .. }));
    }

    #[test]
    fn test_unconstrained_order_is_sorted_by_skill() {
        // All girls, so the balance constraint never binds
        let players: Vec<Player> = (0..6)
            .map(|i| make_player(&format!("g{i}"), true, 100 * (6 - i) as i64))
            .collect();
        let order = create_batting_order(&players, "06/09").unwrap();
        let skills: Vec<i64> = order.players.iter().map(|p| p.batting_skill).collect();
        let mut sorted = skills.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(skills, sorted);
    }

    #[test]
    fn test_attendance_filter_limits_the_order() {
        let mut players = mixed_roster(8, 3);
        players[7].attendance.insert("06/09".to_string(), false);
        let order = create_batting_order(&players, "06/09").unwrap();
        assert_eq!(order.players.len(), 7);
        assert!(order.players.iter().all(|p| p.name != "player7"));
    }

    #[test]
    fn test_no_attending_players_is_an_error() {
        let players = mixed_roster(4, 2);
        let err = create_batting_order(&players, "07/01").unwrap_err();
        assert!(matches!(err, LineupError::NoPlayers { .. }));
    }

    #[test]
    fn test_resolving_identical_input_gives_same_objective() {
        let players = mixed_roster(9, 4);
        let first = create_batting_order(&players, "06/09").unwrap();
        let second = create_batting_order(&players, "06/09").unwrap();
        assert!((first.objective - second.objective).abs() < 1e-6);
    }
}
