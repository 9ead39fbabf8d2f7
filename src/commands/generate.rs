use anyhow::{Context, Result};
use std::path::PathBuf;

use roundplan::config::Config;
use roundplan::export::render_csv;
use roundplan::planner::{Plan, ScheduleConfig, SchedulePlanner, SelectionMode};
use roundplan::server::dto::{PairRoundDto, PlanDto, ScheduleStatsDto};

// ============================================================================
// Generate
// ============================================================================

/// Parameters for the generate command
pub struct GenerateParams {
    pub players: Vec<String>,
    pub rounds: usize,
    pub per_round: Option<usize>,
    pub selection: Option<String>,
    pub seed: Option<u64>,
    pub csv: Option<PathBuf>,
    pub json: bool,
}

/// Generate one plan and print it
pub fn generate(config: &Config, params: GenerateParams) -> Result<()> {
    let GenerateParams {
        players,
        rounds,
        per_round,
        selection,
        seed,
        csv,
        json,
    } = params;

    let mut config = config.clone();
    if let Some(selection) = selection {
        config.algorithm.selection =
            SelectionMode::from_id(&selection).context("Invalid --selection")?;
    }
    if seed.is_some() {
        config.algorithm.seed = seed;
    }

    let mut planner = SchedulePlanner::new(config.algorithm.selection, config.generator_config());
    let request = ScheduleConfig::new(players, rounds)
        .with_players_per_round(per_round.unwrap_or(config.algorithm.players_per_round));

    let plan = planner
        .generate(&request)
        .context("Schedule generation failed")?;

    if let Some(path) = csv {
        std::fs::write(&path, render_csv(&plan)?)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote plan CSV");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&PlanDto::from(&plan))?);
        return Ok(());
    }

    print_plan(&plan);
    print_summary(&planner);
    Ok(())
}

fn print_plan(plan: &Plan) {
    println!("Plan {}", plan.id);
    println!("{:=<60}", "");
    for round in &plan.rounds {
        println!(
            "  Round {:>3}  {}  {}",
            round.round_no,
            round.date,
            round.player_names().join(", ")
        );
    }
    println!();
}

fn print_summary(planner: &SchedulePlanner) {
    let stats = ScheduleStatsDto::new(&planner.statistics(), planner.fallback_count());

    println!("Statistics");
    println!("{:-<60}", "");
    println!("  Unique groups:   {}", stats.total_unique_pairings);
    println!("  Total records:   {}", stats.total_pairing_records);
    println!(
        "  Frequency:       min {} / max {} / avg {:.2}",
        stats.min_frequency, stats.max_frequency, stats.avg_frequency
    );
    if stats.fallback_count > 0 {
        println!("  Fallbacks:       {}", stats.fallback_count);
    }
    println!();

    println!("Player usage");
    println!("{:-<60}", "");
    for usage in planner.per_player_usage_counts() {
        println!("  {:<20} {}", usage.name, usage.count);
    }
}

// ============================================================================
// Pairs
// ============================================================================

/// Generate rounds of pairs and print them
pub fn pairs(config: &Config, players: Vec<String>, rounds: usize, json: bool) -> Result<()> {
    let mut planner = SchedulePlanner::new(config.algorithm.selection, config.generator_config());
    let schedule = planner
        .generate_pair_rounds(&players, rounds)
        .context("Pair generation failed")?;
    let schedule = PairRoundDto::from_rounds(schedule)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    for round in &schedule {
        let pairs: Vec<String> = round.pairs.iter().map(|p| p.join(" & ")).collect();
        println!("  Round {:>3}  {}", round.round_no, pairs.join(" | "));
    }
    Ok(())
}
