use csv::Reader;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::lineup::types::{position_id, FIELDING_POSITIONS};

/// One roster member, with skill already normalized to larger-is-better
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub email: String,
    pub is_girl: bool,
    pub batting_skill: i64,
    pub attendance: HashMap<String, bool>,   // "MM/DD" -> attending
    pub possibilities: HashMap<u8, bool>,    // position id -> may ever play it
}

impl Player {
    /// Whether the player is marked attending for the given game date
    pub fn attends(&self, game_date: &str) -> bool {
        self.attendance.get(game_date).copied().unwrap_or(false)
    }

    /// Whether the player may ever be assigned the given position.
    /// A position missing from the roster sheet counts as ineligible.
    pub fn can_play(&self, position: u8) -> bool {
        self.possibilities.get(&position).copied().unwrap_or(false)
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read roster file: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster is missing required column {0:?}")]
    MissingColumn(&'static str),
    #[error("row {row}: missing value for {column:?}")]
    MissingField { row: usize, column: String },
    #[error("row {row}: invalid batting skill {value:?} (expected an integer rank)")]
    InvalidSkill { row: usize, value: String },
}

/// Parses a yes/no cell from its various spreadsheet spellings
fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower == "yes" || lower == "true" || lower == "1"
}

/// Loads the roster from a CSV file and normalizes batting skill
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Player>, RosterError> {
    let reader = Reader::from_path(csv_path)?;
    load_roster_from_reader(reader)
}

/// Loads the roster from any CSV reader
///
/// Required columns: Name, Email, "Is Girl?", "Batting Skill". Attendance
/// columns ("Attendance MM/DD?") and per-position eligibility columns
/// ("Can Play P?", "Can Play 1B?", ...) are discovered from the header;
/// any number of game dates is accepted and a missing position column
/// makes everyone ineligible for that position.
pub fn load_roster_from_reader<R: Read>(mut reader: Reader<R>) -> Result<Vec<Player>, RosterError> {
    let headers = reader.headers()?.clone();

    let name_col = headers.iter().position(|h| h.trim() == "Name")
        .ok_or(RosterError::MissingColumn("Name"))?;
    let email_col = headers.iter().position(|h| h.trim() == "Email")
        .ok_or(RosterError::MissingColumn("Email"))?;
    let girl_col = headers.iter().position(|h| h.trim() == "Is Girl?")
        .ok_or(RosterError::MissingColumn("Is Girl?"))?;
    let skill_col = headers.iter().position(|h| h.trim() == "Batting Skill")
        .ok_or(RosterError::MissingColumn("Batting Skill"))?;

    // Discover attendance and eligibility columns from the header
    let mut attendance_cols: Vec<(usize, String)> = Vec::new();
    let mut possibility_cols: Vec<(usize, u8)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let header = header.trim();
        if let Some(rest) = header.strip_prefix("Attendance ") {
            if let Some(date) = rest.strip_suffix('?') {
                attendance_cols.push((idx, date.trim().to_string()));
            }
        } else if let Some(rest) = header.strip_prefix("Can Play ") {
            if let Some(abbreviation) = rest.strip_suffix('?') {
                if let Some(position) = position_id(abbreviation.trim()) {
                    possibility_cols.push((idx, position));
                }
            }
        }
    }

    let mut players = Vec::new();
    for (record_index, result) in reader.records().enumerate() {
        let record = result?;
        let row = record_index + 2; // header is row 1

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            return Err(RosterError::MissingField { row, column: "Name".to_string() });
        }
        let email = record.get(email_col).unwrap_or("").trim().to_string();
        let is_girl = parse_bool(record.get(girl_col).unwrap_or(""));

        let skill_value = record.get(skill_col).unwrap_or("").trim();
        let batting_skill: i64 = skill_value.parse().map_err(|_| RosterError::InvalidSkill {
            row,
            value: skill_value.to_string(),
        })?;

        let mut attendance = HashMap::new();
        for (idx, date) in &attendance_cols {
            attendance.insert(date.clone(), parse_bool(record.get(*idx).unwrap_or("")));
        }

        // Every position gets an entry; absent columns stay ineligible
        let mut possibilities: HashMap<u8, bool> = FIELDING_POSITIONS
            .iter()
            .map(|&position| (position, false))
            .collect();
        for (idx, position) in &possibility_cols {
            possibilities.insert(*position, parse_bool(record.get(*idx).unwrap_or("")));
        }

        players.push(Player {
            name,
            email,
            is_girl,
            batting_skill,
            attendance,
            possibilities,
        });
    }

    // The sheet ranks skill with 1 as best; flip it so that higher
    // scores dominate the optimization objectives
    let roster_size = players.len() as i64;
    for player in &mut players {
        player.batting_skill = 100 * (1 + (roster_size - player.batting_skill));
    }

    Ok(players)
}

/// All game dates that appear in any player's attendance columns, sorted
pub fn attendance_dates(players: &[Player]) -> Vec<String> {
    let dates: BTreeSet<String> = players
        .iter()
        .flat_map(|p| p.attendance.keys().cloned())
        .collect();
    dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::types::position_name;

    fn reader_from(data: &str) -> Reader<&[u8]> {
        Reader::from_reader(data.as_bytes())
    }

    fn roster_header() -> String {
        let mut header = "Name,Email,Is Girl?,Batting Skill,Attendance 06/09?".to_string();
        for position in FIELDING_POSITIONS {
            header.push_str(&format!(",Can Play {}?", position_name(position).unwrap()));
        }
        header
    }

    fn roster_line(name: &str, girl: &str, skill: &str, attending: &str) -> String {
        format!(
            "{},{}@example.com,{},{},{},Yes,Yes,Yes,Yes,Yes,Yes,Yes,Yes,Yes,Yes",
            name, name, girl, skill, attending
        )
    }

    #[test]
    fn test_skill_normalization_is_strictly_decreasing_in_rank() {
        let csv = format!(
            "{}\n{}\n{}\n{}\n",
            roster_header(),
            roster_line("Ava", "Yes", "1", "Yes"),
            roster_line("Ben", "No", "2", "Yes"),
            roster_line("Cal", "No", "3", "Yes"),
        );
        let players = load_roster_from_reader(reader_from(&csv)).unwrap();
        assert_eq!(players[0].batting_skill, 300);
        assert_eq!(players[1].batting_skill, 200);
        assert_eq!(players[2].batting_skill, 100);
        assert!(players[0].batting_skill > players[1].batting_skill);
        assert!(players[1].batting_skill > players[2].batting_skill);
    }

    #[test]
    fn test_attendance_and_eligibility_columns_are_discovered() {
        let csv = format!(
            "{}\n{}\n",
            "Name,Email,Is Girl?,Batting Skill,Attendance 06/09?,Attendance 06/16?,Can Play P?,Can Play SS?",
            "Ava,ava@example.com,Yes,1,Yes,No,Yes,No",
        );
        let players = load_roster_from_reader(reader_from(&csv)).unwrap();
        let ava = &players[0];
        assert!(ava.attends("06/09"));
        assert!(!ava.attends("06/16"));
        assert!(ava.can_play(1));
        assert!(!ava.can_play(6));
        // Positions without a column are ineligible but still present
        assert_eq!(ava.possibilities.len(), FIELDING_POSITIONS.len());
        assert!(!ava.can_play(2));
        assert_eq!(attendance_dates(&players), vec!["06/09", "06/16"]);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "Name,Is Girl?,Batting Skill\nAva,Yes,1\n";
        let err = load_roster_from_reader(reader_from(csv)).unwrap_err();
        assert!(matches!(err, RosterError::MissingColumn("Email")));
    }

    #[test]
    fn test_invalid_skill_identifies_row() {
        let csv = format!(
            "{}\n{}\n{}\n",
            roster_header(),
            roster_line("Ava", "Yes", "1", "Yes"),
            roster_line("Ben", "No", "fast", "Yes"),
        );
        let err = load_roster_from_reader(reader_from(&csv)).unwrap_err();
        match err {
            RosterError::InvalidSkill { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_yes_no_spellings() {
        assert!(parse_bool("Yes"));
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("No"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let csv = format!(
            "{}\n{}\n{}\n",
            roster_header(),
            roster_line("Ava", "Yes", "1", "Yes"),
            roster_line("Ava", "Yes", "2", "Yes"),
        );
        let players = load_roster_from_reader(reader_from(&csv)).unwrap();
        assert_eq!(players.len(), 2);
    }
}
