//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `planner_core` linkage and the in-memory store bootstrap.
//! - Keep output deterministic apart from the generated week.

use planner_core::{open_db_in_memory, PlannerService, SqliteSnapshotRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("planner_core ping={}", planner_core::ping());
    println!("planner_core version={}", planner_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("store open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteSnapshotRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("store init failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let service = PlannerService::open(repo);
    let state = service.state();
    println!(
        "seed days={} library={} habits={} goals={} rewards={} balance={}",
        state.days.len(),
        state.library.len(),
        state.habits.len(),
        state.goals.len(),
        state.rewards.len(),
        service.balance()
    );
    println!("categories={}", service.categories().join(","));
    ExitCode::SUCCESS
}
