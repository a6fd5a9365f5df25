use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::parser::{Player, RosterError};
use crate::lineup::{BattingOrder, FieldingAssignment};
use crate::lineup::types::{position_name, BENCH, FIELDING_POSITIONS};

/// One line of the roster-by-inning table: a batter and where they
/// field (or sit) each inning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub batting_slot: usize, // 1-based batting order position
    pub name: String,
    pub innings: Vec<String>, // position abbreviation or "Bench"
}

/// Formats a player's gender the way the printed results label it
fn gender_label(player: &Player) -> &'static str {
    if player.is_girl { "Girl" } else { "Guy" }
}

/// Prints a section header banner
pub fn print_section_header(title: &str) {
    println!("\n=== {} ===", title);
}

/// Prints the loaded roster as one JSON record per player
pub fn print_player_roster(players: &[Player]) {
    print_section_header("Reading in Roster");
    for player in players {
        match serde_json::to_string_pretty(player) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{} <unprintable>", player.name),
        }
    }
}

/// Prints the solved batting order with skill and gender details
pub fn print_batting_order(order: &BattingOrder) {
    print_section_header("Batting Order");
    for (slot, player) in order.players.iter().enumerate() {
        println!(
            "{}: {} (Gender: {}) (Skill: {})",
            slot + 1,
            player.name,
            gender_label(player),
            player.batting_skill
        );
    }
    println!("Objective value: {}", order.objective);
}

/// Prints one inning's fielding assignment, position by position
pub fn print_fielding_assignment(inning: usize, assignment: &FieldingAssignment) {
    print_section_header(&format!("Fielding, Inning {}", inning + 1));
    for position in FIELDING_POSITIONS {
        if let Some(player) = assignment.positions.get(&position) {
            println!(
                "Position {}: {} (Gender: {}) (Skill: {})",
                position_name(position).unwrap_or("?"),
                player.name,
                gender_label(player),
                player.batting_skill
            );
        }
    }
    println!("Objective value: {}", assignment.objective);
}

/// Builds the roster-by-inning table, one row per batter in order
pub fn build_roster_table(order: &BattingOrder, innings: &[FieldingAssignment]) -> Vec<RosterRow> {
    order
        .players
        .iter()
        .enumerate()
        .map(|(slot, player)| {
            let cells = innings
                .iter()
                .map(|assignment| {
                    assignment
                        .position_of(&player.name)
                        .and_then(position_name)
                        .unwrap_or(BENCH)
                        .to_string()
                })
                .collect();
            RosterRow {
                batting_slot: slot + 1,
                name: player.name.clone(),
                innings: cells,
            }
        })
        .collect()
}

/// Default artifact path, stamped with the current local date
pub fn default_output_path() -> PathBuf {
    let date = chrono::Local::now().format("%d_%m_%Y");
    PathBuf::from(format!("outputs/rizzler_roster_{}.csv", date))
}

/// Writes the roster-by-inning table as the CSV artifact
pub fn write_roster_csv(path: &Path, table: &[RosterRow]) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let num_innings = table.first().map(|row| row.innings.len()).unwrap_or(0);
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["Batting Order".to_string(), "Player Name".to_string()];
    for inning in 1..=num_innings {
        header.push(format!("Inning {}", inning));
    }
    writer.write_record(&header)?;

    for row in table {
        let mut record = vec![row.batting_slot.to_string(), row.name.clone()];
        record.extend(row.innings.iter().cloned());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a previously written roster-by-inning CSV back into table rows
pub fn read_roster_csv(path: &Path) -> Result<Vec<RosterRow>, RosterError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let batting_slot = record
            .get(0)
            .unwrap_or("")
            .trim()
            .parse()
            .map_err(|_| RosterError::MissingField {
                row: rows.len() + 2,
                column: "Batting Order".to_string(),
            })?;
        let name = record.get(1).unwrap_or("").to_string();
        let innings = record.iter().skip(2).map(|cell| cell.to_string()).collect();
        rows.push(RosterRow { batting_slot, name, innings });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_player(name: &str, is_girl: bool) -> Player {
        Player {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            is_girl,
            batting_skill: 100,
            attendance: HashMap::new(),
            possibilities: HashMap::new(),
        }
    }

    fn small_schedule() -> (BattingOrder, Vec<FieldingAssignment>) {
        let order = BattingOrder {
            players: vec![make_player("Ava", true), make_player("Ben", false)],
            objective: 0.0,
        };
        // Inning one: Ava pitches, Ben sits. Inning two: Ben catches, Ava sits.
        let innings = vec![
            FieldingAssignment {
                positions: HashMap::from([(1, make_player("Ava", true))]),
                objective: 0.0,
            },
            FieldingAssignment {
                positions: HashMap::from([(2, make_player("Ben", false))]),
                objective: 0.0,
            },
        ];
        (order, innings)
    }

    #[test]
    fn test_table_maps_positions_and_bench() {
        let (order, innings) = small_schedule();
        let table = build_roster_table(&order, &innings);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].batting_slot, 1);
        assert_eq!(table[0].name, "Ava");
        assert_eq!(table[0].innings, vec!["P", "Bench"]);
        assert_eq!(table[1].batting_slot, 2);
        assert_eq!(table[1].innings, vec!["Bench", "C"]);
    }

    #[test]
    fn test_roster_csv_round_trip() {
        let (order, innings) = small_schedule();
        let table = build_roster_table(&order, &innings);
        let path = std::env::temp_dir().join(format!(
            "rizzler_roster_round_trip_{}.csv",
            std::process::id()
        ));
        write_roster_csv(&path, &table).unwrap();
        let read_back = read_roster_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(read_back, table);
    }
}
