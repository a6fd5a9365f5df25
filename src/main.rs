mod parser;
mod lineup;
mod display;
mod web;

use display::{build_roster_table, default_output_path, print_batting_order,
              print_fielding_assignment, print_player_roster, print_section_header,
              write_roster_csv};
use lineup::create_game_schedule;
use lineup::types::{DEFAULT_MIN_GIRLS_ON_FIELD, DEFAULT_NUM_INNINGS};
use parser::{attendance_dates, load_roster};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let password = std::env::var("ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin123".to_string()); // Default password, change this!

        println!("Starting web server on port {}...", port);
        println!("Admin password: {}", password);
        println!("Access the site at http://localhost:{}", port);

        web::start_server(port, password).await?;
        return Ok(());
    }

    // CLI mode: optional roster path and game date arguments
    let csv_path = args.get(1).map(String::as_str).unwrap_or("inputs/roster.csv");

    print_section_header("Softball Roster Optimization");
    println!("Loading roster from {}...", csv_path);
    let players = load_roster(csv_path)?;
    print_player_roster(&players);

    // Optimize for the requested game date, or the first one in the sheet
    let game_date = match args.get(2) {
        Some(date) => date.clone(),
        None => attendance_dates(&players)
            .into_iter()
            .next()
            .ok_or("roster has no attendance columns; pass a game date")?,
    };
    let attending = players.iter().filter(|p| p.attends(&game_date)).count();
    println!("Loaded {} players ({} attending {})", players.len(), attending, game_date);

    let schedule = create_game_schedule(
        &players,
        &game_date,
        DEFAULT_NUM_INNINGS,
        DEFAULT_MIN_GIRLS_ON_FIELD,
    )?;

    print_batting_order(&schedule.batting);
    for (inning, assignment) in schedule.innings.iter().enumerate() {
        print_fielding_assignment(inning, assignment);
    }

    // Write the roster-by-inning table to the dated CSV artifact
    let table = build_roster_table(&schedule.batting, &schedule.innings);
    let output_path = default_output_path();
    write_roster_csv(&output_path, &table)?;
    println!("\nRoster saved to {}", output_path.display());

    Ok(())
}
