use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use coup_arena::bot::Bot;
use coup_arena::bots::{HonestBot, RandomBot, StaticBot};
use coup_arena::{Config, Coup, CoupError, Registry, Scoreboard, MAX_PLAYERS};

/// Plays bots against each other in games of Coup and ranks them.
#[derive(Parser, Debug)]
#[command(name = "coup-arena")]
struct Args {
    /// Number of games to play
    #[arg(short = 'r', long, default_value_t = 1000)]
    rounds: u64,

    /// Seed for the whole tournament; random if left out
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final scores to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

type Factory = fn(u64) -> Box<dyn Bot>;

fn static_bot(_seed: u64) -> Box<dyn Bot> {
    Box::new(StaticBot)
}

fn honest_bot(_seed: u64) -> Box<dyn Bot> {
    Box::new(HonestBot)
}

fn random_bot(seed: u64) -> Box<dyn Bot> {
    Box::new(RandomBot::new(seed))
}

fn lineup() -> Vec<(&'static str, Factory)> {
    vec![
        ("static", static_bot as Factory),
        ("honest", honest_bot as Factory),
        ("honest-2", honest_bot as Factory),
        ("random", random_bot as Factory),
        ("random-2", random_bot as Factory),
        ("random-3", random_bot as Factory),
        ("random-4", random_bot as Factory),
    ]
}

/// Seats up to six bots from the line-up at random and plays one game.
/// Returns who took part and who won.
fn play_game(seed: u64, config: &Config, lineup: &[(&'static str, Factory)]) -> Result<(Vec<String>, Vec<String>), CoupError> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let num_players = rng.gen_range(2..=MAX_PLAYERS.min(lineup.len()));

    let mut registry = Registry::new();
    for (name, factory) in lineup.choose_multiple(&mut rng, num_players) {
        registry.register(*name, factory(rng.gen()));
    }

    let participants: Vec<String> = registry.names().map(str::to_string).collect();
    let coup = Coup::new(registry, config.with_seed(rng.gen()))?;

    Ok((participants, coup.play()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("failed to load {:?}", path))?,
        None => Config::default(),
    };

    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    let lineup = lineup();

    println!("playing {} games, seed {}", args.rounds, seed);
    let start = Instant::now();

    let scoreboard = (0..args.rounds)
        .into_par_iter()
        .map(|game| play_game(seed.wrapping_add(game * 1000), &config, &lineup))
        .try_fold(Scoreboard::new, |mut scoreboard, game| {
            let (participants, winners) = game?;
            scoreboard.record(&participants, &winners);
            Ok::<_, CoupError>(scoreboard)
        })
        .try_reduce(Scoreboard::new, |a, b| Ok(a.merge(b)))?;

    println!("done in {:.2}s\n", start.elapsed().as_secs_f64());
    println!("{:<12}{:>8}{:>8}{:>10}{:>10}", "bot", "games", "wins", "win %", "score");
    for (name, tally) in scoreboard.leaderboard() {
        println!("{:<12}{:>8}{:>8}{:>10.1}{:>10.2}", name, tally.games, tally.wins, tally.win_rate() * 100.0, tally.score);
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
        scoreboard.write_csv(file).with_context(|| format!("failed to write {:?}", path))?;
        println!("\nscores written to {:?}", path);
    }

    Ok(())
}
