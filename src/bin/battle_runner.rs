//! Headless Battle Runner
//!
//! Runs AI vs AI sieges between two cities and prints the outcome.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sango_tactics::battle::ai::{choose_action, load_personality, AiPersonality};
use sango_tactics::battle::{BattleEngine, ResolutionSummary, Terrain, TurnStatus, Weather};
use sango_tactics::core::{BattleConfig, BattleError, Result};
use sango_tactics::world::{City, Officer, WorldState};

/// Headless Battle Runner - AI vs AI sieges
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI siege and report the result")]
struct Args {
    /// Troops marched out by the attacker
    #[arg(long, default_value_t = 5000)]
    attacker_troops: u32,

    /// Troops holding the defending city
    #[arg(long, default_value_t = 5000)]
    defender_troops: u32,

    /// Terrain around the defending city
    #[arg(long, default_value = "plains")]
    terrain: String,

    /// Weather over the battlefield (omit for none)
    #[arg(long)]
    weather: Option<String>,

    /// Wall strength of the defending city
    #[arg(long)]
    walls: Option<u32>,

    /// Battle configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Attacker AI personality name (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    attacker: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print each round to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    rounds: u32,
    attacker_personality: String,
    defender_personality: String,
    summary: ResolutionSummary,
    log: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("battle_runner: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let terrain: Terrain = args.terrain.parse()?;
    let weather: Option<Weather> = args.weather.as_deref().map(str::parse).transpose()?;
    let walls = args.walls.unwrap_or(config.default_wall_strength);

    let mut world = build_world(&args, terrain, weather, walls);

    // The configured personality defends; --attacker picks the opposing one
    let engine = BattleEngine::with_config(config);
    let attacker_personality = load_personality(&args.attacker).unwrap_or_else(|e| {
        tracing::warn!(personality = %args.attacker, error = %e, "using default personality");
        AiPersonality::default()
    });

    engine.initiate(&mut world, "Xinye", "Fancheng", args.attacker_troops)?;

    let mut log = Vec::new();
    let summary = loop {
        let state = world.active_battle().ok_or(BattleError::NoActiveBattle)?;
        let action = choose_action(state, false, &attacker_personality, &mut rng);

        let outcome = engine.advance(&mut world, action, None, &mut rng)?;
        if args.verbose {
            eprintln!("{}", outcome.message);
        }
        log.push(outcome.report.message.clone());

        if let TurnStatus::Ended(summary) = outcome.status {
            break summary;
        }
    };

    let result = RunResult {
        seed,
        rounds: log.len() as u32,
        attacker_personality: attacker_personality.name.clone(),
        defender_personality: engine.policy().personality().name.clone(),
        summary,
        log,
    };

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

/// Two border cities with one commander each
fn build_world(
    args: &Args,
    terrain: Terrain,
    weather: Option<Weather>,
    walls: u32,
) -> WorldState {
    let mut world = WorldState::new().with_weather(weather);
    world.add_city(City::new("Xinye", "Shu").with_troops(args.attacker_troops));
    world.add_city(
        City::new("Fancheng", "Wei")
            .with_troops(args.defender_troops)
            .with_terrain(terrain)
            .with_walls(walls),
    );
    world.add_officer(Officer::new("Guan Yu", "Shu", 95).stationed_at("Xinye"));
    world.add_officer(Officer::new("Cao Ren", "Wei", 82).stationed_at("Fancheng"));
    world
}

fn print_text(result: &RunResult) {
    let summary = &result.summary;
    println!("Battle Result");
    println!("=============");
    println!("Winner: {} ({})", summary.winner, summary.reason);
    println!("Rounds: {}", result.rounds);
    println!("Fancheng held by: {}", summary.new_owner);
    println!(
        "Attackers surviving: {} ({} home, {} garrison)",
        summary.surviving_attackers, summary.returned_home, summary.garrison
    );
    println!("Defenders remaining: {}", summary.defender_troops);
    println!();
    for line in &result.log {
        println!("  {line}");
    }
    println!();
    println!(
        "Personalities: {} vs {}",
        result.attacker_personality, result.defender_personality
    );
    println!("Seed: {}", result.seed);
}
