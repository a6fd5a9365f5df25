use std::collections::{HashMap, HashSet};

use good_lp::{constraint, default_solver, Expression, ProblemVariables, SolverModel};

use crate::parser::Player;
use super::solver::{assigned_pairs, binary_matrix, map_resolution_error, objective_value, LineupError};
use super::types::{FieldingAssignment, FIELDING_POSITIONS};

/// Reward per inning a player has sat out so far. Large enough to dominate
/// skill and the other bonuses, so playing-time rotation comes first.
const UNUSED_INNINGS_WEIGHT: f64 = 2000.0;

/// One-time reward for a player who was benched the previous inning
const FRESH_PLAYER_BONUS: f64 = 1000.0;

/// Small nudge toward keeping a player at a position they already held
const HELD_POSITION_BONUS: f64 = 5.0;

/// Builds and solves one fielding assignment per inning.
///
/// The innings are solved in order and are sequentially dependent: each
/// solve updates the per-player usage counts and the previous-inning set
/// that the next inning's objective consumes. The first infeasible inning
/// aborts the remaining ones.
pub fn create_fielding_schedule(
    players: &[Player],
    game_date: &str,
    num_innings: usize,
    min_girls: usize,
) -> Result<Vec<FieldingAssignment>, LineupError> {
    let fielders: Vec<&Player> = players.iter().filter(|p| p.attends(game_date)).collect();
    let num_fielders = fielders.len();
    if num_fielders == 0 {
        return Err(LineupError::NoPlayers { date: game_date.to_string() });
    }
    if num_fielders < FIELDING_POSITIONS.len() {
        return Err(LineupError::TooFewPlayers {
            available: num_fielders,
            required: FIELDING_POSITIONS.len(),
        });
    }

    let mut assignments: Vec<FieldingAssignment> = Vec::with_capacity(num_innings);
    let mut used_players: HashSet<String> = HashSet::new();
    let mut player_uses: HashMap<String, usize> =
        fielders.iter().map(|p| (p.name.clone(), 0)).collect();

    for inning in 0..num_innings {
        let assignment = solve_inning(
            &fielders,
            inning,
            num_innings,
            min_girls,
            &used_players,
            &player_uses,
            &assignments,
        )?;

        // The solved inning becomes the usage state the next inning sees
        used_players.clear();
        for player in assignment.positions.values() {
            used_players.insert(player.name.clone());
            *player_uses.entry(player.name.clone()).or_insert(0) += 1;
        }
        assignments.push(assignment);
    }

    Ok(assignments)
}

/// Builds and solves the assignment model for a single inning
fn solve_inning(
    fielders: &[&Player],
    inning: usize,
    num_innings: usize,
    min_girls: usize,
    used_players: &HashSet<String>,
    player_uses: &HashMap<String, usize>,
    earlier_innings: &[FieldingAssignment],
) -> Result<FieldingAssignment, LineupError> {
    let num_fielders = fielders.len();
    let num_positions = FIELDING_POSITIONS.len();
    let context = format!("fielding, inning {}", inning + 1);

    let mut vars = ProblemVariables::new();
    let x = binary_matrix(&mut vars, num_fielders, num_positions);

    // Skill plus rotation fairness plus a nudge toward repeat positions
    let objective: Expression = (0..num_fielders)
        .flat_map(|i| {
            let x = &x;
            let player = fielders[i];
            let uses = player_uses.get(&player.name).copied().unwrap_or(0);
            let mut base = player.batting_skill as f64
                + UNUSED_INNINGS_WEIGHT * (num_innings - uses) as f64;
            if !used_players.contains(&player.name) {
                base += FRESH_PLAYER_BONUS;
            }
            (0..num_positions).map(move |j| {
                let position = FIELDING_POSITIONS[j];
                let mut coefficient = base;
                if earlier_innings
                    .iter()
                    .any(|a| a.positions.get(&position).is_some_and(|p| p.name == player.name))
                {
                    coefficient += HELD_POSITION_BONUS;
                }
                coefficient * x[i][j]
            })
        })
        .sum();

    let mut model = vars.maximise(objective.clone()).using(default_solver);

    // Each player covers at most one position
    for i in 0..num_fielders {
        let row: Expression = (0..num_positions).map(|j| Expression::from(x[i][j])).sum();
        model = model.with(constraint!(row <= 1.0));
    }

    // Each position is covered by exactly one player
    for j in 0..num_positions {
        let column: Expression = (0..num_fielders).map(|i| Expression::from(x[i][j])).sum();
        model = model.with(constraint!(column == 1.0));
    }

    // Keep at least min_girls girls on the field
    let girls_on_field: Expression = (0..num_fielders)
        .filter(|&i| fielders[i].is_girl)
        .flat_map(|i| (0..num_positions).map(move |j| (i, j)))
        .map(|(i, j)| Expression::from(x[i][j]))
        .sum();
    model = model.with(constraint!(girls_on_field >= min_girls as f64));

    // A player never takes a position they are not cleared for
    for i in 0..num_fielders {
        for j in 0..num_positions {
            if !fielders[i].can_play(FIELDING_POSITIONS[j]) {
                let barred = x[i][j];
                model = model.with(constraint!(barred <= 0.0));
            }
        }
    }

    let solution = model
        .solve()
        .map_err(|e| map_resolution_error(e, &context))?;

    let mut positions: HashMap<u8, Player> = HashMap::new();
    for (i, j) in assigned_pairs(&solution, &x) {
        positions.insert(FIELDING_POSITIONS[j], fielders[i].clone());
    }

    Ok(FieldingAssignment {
        positions,
        objective: objective_value(objective, &solution),
    })
}
