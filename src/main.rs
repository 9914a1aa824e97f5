//! Sugar Board Optimizer
//!
//! Places an inventory of graded polyomino pieces onto a partially blocked
//! grid to maximize base score plus stepped modifier bonuses, and prints
//! the winning arrangement.

use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sugarboard::board::{Board, CellRef};
use sugarboard::pool::PieceSpec;
use sugarboard::score::Grade;
use sugarboard::solution::format_solution;
use sugarboard::{solve, SolveOutcome, SolveRequest};

/// Optimizes piece placement on a sugar board.
#[derive(Parser)]
#[command(name = "sugarboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a JSON request file and print the solution.
    Solve { path: String },
    /// Solve the built-in demo scenario.
    Demo,
    /// List the shape catalog.
    Shapes,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Solve { path }) => run_solve(&path),
        Some(Command::Demo) | None => {
            run_request(&demo_request());
            ExitCode::SUCCESS
        }
        Some(Command::Shapes) => {
            run_shapes();
            ExitCode::SUCCESS
        }
    }
}

fn run_solve(path: &str) -> ExitCode {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            eprintln!("Failed to read {path}: {error}");
            return ExitCode::FAILURE;
        }
    };
    let request: SolveRequest = match serde_json::from_str(&raw) {
        Ok(request) => request,
        Err(error) => {
            eprintln!("Invalid request in {path}: {error}");
            return ExitCode::FAILURE;
        }
    };
    run_request(&request);
    ExitCode::SUCCESS
}

fn run_request(request: &SolveRequest) {
    let outcome = solve(request);
    print_outcome(request, &outcome);
}

fn print_outcome(request: &SolveRequest, outcome: &SolveOutcome) {
    let solution = &outcome.solution;
    let board = Board::new(request.rows, request.cols, &request.blocked);

    println!(
        "Total {} (base {} + bonus {})",
        solution.total_score, solution.base_score, solution.bonus_score
    );
    print!("{}", format_solution(&board, solution));
    for placement in &solution.placements {
        println!("  {}: {}", placement.id, placement.label);
    }
    for entry in &solution.bonus_breakdown {
        println!(
            "  bonus {}: {} cells -> {}",
            entry.modifier, entry.cells, entry.bonus
        );
    }
    for report in &outcome.reports {
        println!(
            "  strategy {}: score {} in {}ms",
            report.strategy, report.total_score, report.duration_ms
        );
    }

    match serde_json::to_string_pretty(solution) {
        Ok(json) => println!("{json}"),
        Err(error) => eprintln!("Failed to encode solution: {error}"),
    }
}

fn run_shapes() {
    for shape in sugarboard::shapes::all_shapes() {
        println!(
            "{} ({}x{}, {} cells)",
            shape.key, shape.width, shape.height, shape.area
        );
    }
}

/// A 7x7 board with a few blocked cells and a mixed dealer inventory.
fn demo_request() -> SolveRequest {
    let piece = |id: &str, modifier: Option<&str>, grade: Grade, shape_key: &str, quantity| {
        PieceSpec {
            id: Some(id.to_string()),
            role: "dealer".to_string(),
            modifier: modifier.map(str::to_string),
            grade,
            shape_key: shape_key.to_string(),
            quantity,
        }
    };

    SolveRequest {
        rows: 7,
        cols: 7,
        blocked: vec![
            CellRef { row: 0, col: 0 },
            CellRef { row: 0, col: 6 },
            CellRef { row: 3, col: 3 },
            CellRef { row: 6, col: 0 },
        ],
        pieces: vec![
            piece("se-plus", Some("radiance"), Grade::SuperEpic, "5_plus", 1),
            piece("se-u", Some("radiance"), Grade::SuperEpic, "5_U_down", 1),
            piece("ep-square", Some("radiance"), Grade::Epic, "4_square", 2),
            piece("ep-tee", Some("piercing"), Grade::Epic, "4_T_up", 2),
            piece("ra-bar", Some("piercing"), Grade::Rare, "3_bar_h", 3),
            piece("ra-ell", Some("piercing"), Grade::Rare, "3_L_se", 2),
            piece("un-rect", None, Grade::Unique, "8_rect_v", 1),
        ],
        role: "dealer".to_string(),
        time_limit_ms: 6_000,
    }
}
