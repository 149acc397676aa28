//! Spellkeep - Main Binary
//!
//! Seeded self-play simulation and replay verification for the engine.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use spellkeep::{
    core::Side,
    game::{actions::legal_actions, GameConfig, GamePhase, GameSessions, GameStatus},
    registry::CardRegistry,
    replay::{replay, ReplayLog},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spellkeep")]
#[command(about = "Spellkeep - asymmetric card game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a seeded random-policy self-play game through the orchestrator
    Simulate {
        /// RNG seed for the game
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Stop after this many submitted actions
        #[arg(long, default_value = "500")]
        max_actions: usize,

        /// Print every command emitted to each side
        #[arg(long)]
        log_commands: bool,

        /// Write the replay log to this file when the game ends
        #[arg(long, value_name = "FILE")]
        save_replay: Option<PathBuf>,
    },

    /// Re-run a saved replay log and verify it completes
    Replay {
        /// Replay log file (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            seed,
            max_actions,
            log_commands,
            save_replay,
        } => simulate(seed, max_actions, log_commands, save_replay),
        Commands::Replay { file } => run_replay(&file),
    }
}

/// Random-policy self-play: both sides pick uniformly among their legal
/// actions using a policy RNG derived from the game seed.
fn simulate(
    seed: u64,
    max_actions: usize,
    log_commands: bool,
    save_replay: Option<PathBuf>,
) -> anyhow::Result<()> {
    use rand::{Rng, SeedableRng};

    let registry = CardRegistry::global();
    let sessions = GameSessions::new();
    let game = sessions
        .create_game(GameConfig::with_seed(seed))
        .context("failed to create game")?;
    let mut policy_rng = rand_chacha::ChaCha12Rng::seed_from_u64(seed ^ 0x5e11_c0de);

    let mut submitted = 0;
    while submitted < max_actions {
        let state = sessions.state_snapshot(game)?;
        if matches!(state.status, GameStatus::Finished { .. } | GameStatus::Degraded) {
            break;
        }

        let side = match state.phase {
            GamePhase::Mulligan => {
                if !state.player(Side::Overlord).mulligan_decided {
                    Side::Overlord
                } else {
                    Side::Champion
                }
            }
            GamePhase::ActivePlay(side) => side,
            other => bail!("simulation stuck in phase {other}"),
        };

        let actions = legal_actions(&state, side, registry);
        if actions.is_empty() {
            bail!("no legal actions for {side} in {}", state.phase);
        }
        let action = actions[policy_rng.gen_range(0..actions.len())].clone();
        let lists = sessions.submit_action(game, side, action)?;
        submitted += 1;

        if log_commands {
            for (recipient, list) in lists.iter() {
                for command in list.iter() {
                    println!("[{recipient}] {command:?}");
                }
            }
        }
    }

    let state = sessions.state_snapshot(game)?;
    println!("actions submitted: {submitted}");
    println!("turns played:      {}", state.turn.number);
    println!(
        "final score:       Overlord {} - {} Champion",
        state.player(Side::Overlord).score,
        state.player(Side::Champion).score
    );
    match state.status {
        GameStatus::Finished { winner: Some(side) } => println!("winner:            {side}"),
        GameStatus::Finished { winner: None } => println!("winner:            (draw)"),
        GameStatus::Active => println!("game still running at action cap"),
        GameStatus::Degraded => bail!("game degraded during simulation"),
    }

    if let Some(path) = save_replay {
        let log = sessions.replay_log(game)?;
        std::fs::write(&path, log.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("replay saved to    {}", path.display());
    }
    Ok(())
}

fn run_replay(file: &PathBuf) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let log = ReplayLog::from_json(&json)?;
    let entries = log.entries.len();
    let state = replay(&log).context("replay diverged")?;

    println!("replayed {entries} actions for {}", log.game_id);
    println!(
        "final score: Overlord {} - {} Champion",
        state.player(Side::Overlord).score,
        state.player(Side::Champion).score
    );
    state
        .check_zone_partition()
        .context("zone partition violated after replay")?;
    println!("zone partition holds");
    Ok(())
}
