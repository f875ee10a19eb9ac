use serde::Serialize;

use crate::data::game_data::GameData;
use crate::data::plan::load_plan;
use crate::data::stats::Stats;
use crate::data::validate::validate_plan_file;
use crate::error::Result;
use crate::optimizer::{LevelUpSuggestion, Planner, ReclassSuggestion, Scenario};

const USAGE: &str = "usage: squadron <solve|level-up|reclass|train|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Solve,
    LevelUp,
    Reclass,
    Train,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("solve") => Some(Command::Solve),
        Some("level-up") => Some(Command::LevelUp),
        Some("reclass") => Some(Command::Reclass),
        Some("train") => Some(Command::Train),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Solve) => handle_solve(args),
        Some(Command::LevelUp) => handle_level_up(args),
        Some(Command::Reclass) => handle_reclass(args),
        Some(Command::Train) => handle_train(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

#[derive(Debug, Serialize)]
struct LevelUpOutput {
    baseline_shortfall: Option<u32>,
    suggestions: Vec<LevelUpSuggestion>,
}

#[derive(Debug, Serialize)]
struct ReclassOutput {
    baseline_shortfall: Option<u32>,
    suggestions: Vec<ReclassSuggestion>,
}

fn handle_solve(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: squadron solve <plan.json>");
        return 2;
    };
    let outcome = load_scenario(path).and_then(|(planner, scenario)| {
        planner.baseline_with_progress(&scenario, |done, total| {
            tracing::debug!(done, total, "baseline progress");
        })
    });
    match outcome {
        Ok(report) => print_json(&report, "baseline report"),
        Err(err) => {
            eprintln!("solve failed: {err}");
            1
        }
    }
}

fn handle_level_up(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: squadron level-up <plan.json>");
        return 2;
    };
    let outcome = load_scenario(path).and_then(|(planner, scenario)| {
        let baseline = planner.baseline(&scenario)?;
        let suggestions = planner.level_up(&scenario, baseline.baseline_shortfall)?;
        Ok(LevelUpOutput {
            baseline_shortfall: baseline.baseline_shortfall,
            suggestions,
        })
    });
    match outcome {
        Ok(output) => print_json(&output, "level-up suggestions"),
        Err(err) => {
            eprintln!("level-up failed: {err}");
            1
        }
    }
}

fn handle_reclass(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: squadron reclass <plan.json>");
        return 2;
    };
    let outcome = load_scenario(path).and_then(|(planner, scenario)| {
        let baseline = planner.baseline(&scenario)?;
        let suggestions = planner.reclass(&scenario, baseline.baseline_shortfall)?;
        Ok(ReclassOutput {
            baseline_shortfall: baseline.baseline_shortfall,
            suggestions,
        })
    });
    match outcome {
        Ok(output) => print_json(&output, "reclass suggestions"),
        Err(err) => {
            eprintln!("reclass failed: {err}");
            1
        }
    }
}

fn handle_train(args: &[String]) -> i32 {
    let usage = "usage: squadron train <physical> <mental> <tactical> <action> <capacity>";
    let (Some(physical), Some(mental), Some(tactical), Some(action), Some(capacity)) = (
        parse_u32_arg(args.get(2)),
        parse_u32_arg(args.get(3)),
        parse_u32_arg(args.get(4)),
        args.get(5),
        parse_u32_arg(args.get(6)),
    ) else {
        eprintln!("{usage}");
        return 2;
    };

    let data = match GameData::from_env() {
        Ok(data) => data,
        Err(err) => {
            eprintln!("failed to load game data: {err}");
            return 1;
        }
    };
    let pool = Stats::new(physical, mental, tactical);
    match data.actions().apply_by_id(pool, action, capacity) {
        Some(next) => print_json(&next, "training pool"),
        None => {
            eprintln!("action '{action}' is not valid from {pool} at capacity {capacity}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: squadron validate <plan.json>");
        return 2;
    };
    let report = GameData::from_env().and_then(|data| validate_plan_file(path, &data));
    match report {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            let code = print_json(&report, "validation report");
            if code != 0 {
                return code;
            }
            if report.has_errors() {
                eprintln!("validation failed: {path}");
                1
            } else {
                eprintln!("validation passed: {path}");
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn load_scenario(path: &str) -> Result<(Planner, Scenario)> {
    let data = GameData::from_env()?;
    let scenario = load_plan(path)?.into_scenario(&data)?;
    tracing::info!(
        path,
        roster = scenario.roster().len(),
        capacity = scenario.capacity(),
        "plan loaded"
    );
    Ok((Planner::from_game_data(&data), scenario))
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn parse_u32_arg(raw: Option<&String>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
}
