//! Royale CLI
//!
//! Terminal front end for the roulette table. It only renders session state
//! and forwards player input; every rule lives in the library.

use clap::{Parser, Subcommand};
use royale::{
    config::{generate_sample_config, ConfigLoader, RoyaleConfig},
    errors::{RoyaleResult, TableError},
    games::{
        color_of, run_simulation, Bet, BetCategory, BetTarget, GameSession, RandomOutcome,
        RouletteTable, SessionState, SimulationConfig, TableHandle,
    },
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Royale roulette CLI
#[derive(Parser)]
#[command(name = "royale")]
#[command(about = "Single-player European roulette")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sit down at an interactive table
    Play,

    /// Play one wager repeatedly and report the house edge
    Simulate {
        /// Number of rounds to play
        #[arg(short, long, default_value = "10000")]
        rounds: usize,

        /// Bet category (straight, red, black, even, odd, low, high)
        #[arg(short, long, default_value = "red")]
        bet: BetCategory,

        /// Pocket for straight bets
        #[arg(short, long)]
        number: Option<u8>,

        /// Stake per round
        #[arg(short, long, default_value = "10")]
        amount: u64,

        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a sample configuration file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> RoyaleResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "royale=debug" } else { "royale=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    match cli.command {
        Commands::Play => run_table(config).await,
        Commands::Simulate { rounds, bet, number, amount, seed, json } => {
            let target = match (bet, number) {
                (_, Some(n)) => BetTarget::Number(n),
                (category, None) => BetTarget::for_category(category),
            };
            let seed = seed.or(config.rng.seed);
            run_simulate(rounds, Bet::new(bet, target, amount), config.table.starting_balance, seed, json)
        }
        Commands::InitConfig { path } => {
            generate_sample_config(&path.to_string_lossy())?;
            println!("Wrote sample configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run_simulate(rounds: usize, bet: Bet, starting_balance: u64, seed: Option<u64>, json: bool) -> RoyaleResult<()> {
    let config = SimulationConfig { rounds, bet, starting_balance };

    let report = run_simulation(&config, RandomOutcome::from_optional_seed(seed))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

/// Player input at the table
#[derive(Debug, Clone, PartialEq)]
enum PlayerCommand {
    Chip(u64),
    Bet(BetCategory, BetTarget),
    Clear,
    Spin,
    State,
    History,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<PlayerCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        ["chip", value] => value
            .parse()
            .map(PlayerCommand::Chip)
            .map_err(|_| format!("Not a chip value: {}", value)),
        ["bet", "straight", number] | ["bet", number] if number.parse::<u8>().is_ok() => number
            .parse()
            .map(|n| PlayerCommand::Bet(BetCategory::Straight, BetTarget::Number(n)))
            .map_err(|_| format!("Not a number: {}", number)),
        ["bet", category] => {
            let category: BetCategory = category.parse().map_err(|e| format!("{}", e))?;
            if category == BetCategory::Straight {
                return Err("Straight bets need a number: bet straight 17".to_string());
            }
            Ok(PlayerCommand::Bet(category, BetTarget::for_category(category)))
        }
        ["clear"] => Ok(PlayerCommand::Clear),
        ["spin"] => Ok(PlayerCommand::Spin),
        ["state"] => Ok(PlayerCommand::State),
        ["history"] => Ok(PlayerCommand::History),
        ["help"] | [] => Ok(PlayerCommand::Help),
        ["quit"] | ["exit"] => Ok(PlayerCommand::Quit),
        _ => Err(format!("Unknown command: {}", line.trim())),
    }
}

const HELP: &str = "\
Commands:
  chip <value>          choose the chip placed by the next bets
  bet <number>          straight bet on 0-36
  bet straight <number> same as above
  bet <category>        red, black, even, odd, low (1-18), high (19-36)
  clear                 take all bets back
  spin                  spin the wheel
  state                 print the session as JSON
  history               last ten winning numbers
  quit";

async fn run_table(config: RoyaleConfig) -> RoyaleResult<()> {
    let session = GameSession::new(&config);
    let (table, task) = RouletteTable::spawn(session, config.spin.resolve_delay());
    let mut chip = config.table.default_chip;

    println!("{}", render_state(&table.state().await?));
    println!("Chips: {:?} (current {}). Type 'help' for commands.", config.table.chip_denominations, chip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            PlayerCommand::Chip(value) if config.table.chip_denominations.contains(&value) => {
                chip = value;
                println!("Chip value set to {}", chip);
            }
            PlayerCommand::Chip(value) => {
                println!("No {} chip. Choose one of {:?}", value, config.table.chip_denominations);
            }
            PlayerCommand::Bet(category, target) => {
                println!("{}", render_state(&table.place_bet(category, target, chip).await?));
            }
            PlayerCommand::Clear => println!("{}", render_state(&table.clear_bets().await?)),
            PlayerCommand::Spin => spin_and_wait(&table).await?,
            PlayerCommand::State => println!("{}", serde_json::to_string_pretty(&table.state().await?)?),
            PlayerCommand::History => println!("{}", render_history(&table.state().await?.history)),
            PlayerCommand::Help => println!("{}", HELP),
            PlayerCommand::Quit => break,
        }
    }

    table.shutdown()?;
    drop(table);
    task.await.map_err(|e| TableError::TaskFailed(e.to_string()))?;
    Ok(())
}

async fn spin_and_wait(table: &TableHandle) -> RoyaleResult<()> {
    if table.spin().await?.is_none() {
        println!("{}", render_state(&table.state().await?));
        return Ok(());
    }

    println!("The wheel is spinning...");
    let state = table.wait_until_idle().await?;
    println!("{}", render_state(&state));
    Ok(())
}

fn render_history(history: &[u8]) -> String {
    if history.is_empty() {
        return "No spins yet...".to_string();
    }
    history
        .iter()
        .map(|&n| format!("{} ({})", n, color_of(n)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_state(state: &SessionState) -> String {
    let last = match state.last_result {
        Some(n) => format!("{} ({})", n, color_of(n)),
        None => "-".to_string(),
    };
    format!(
        "Balance: {} chips | On table: {} | Last: {}\n> {}",
        state.balance,
        state.total_staked(),
        last,
        state.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bets() {
        assert_eq!(
            parse_command("bet 17"),
            Ok(PlayerCommand::Bet(BetCategory::Straight, BetTarget::Number(17)))
        );
        assert_eq!(
            parse_command("bet straight 0"),
            Ok(PlayerCommand::Bet(BetCategory::Straight, BetTarget::Number(0)))
        );
        assert_eq!(
            parse_command("bet high"),
            Ok(PlayerCommand::Bet(BetCategory::High, BetTarget::Label("19-36".to_string())))
        );
        assert!(parse_command("bet straight").is_err());
        assert!(parse_command("bet column").is_err());
    }

    #[test]
    fn test_parse_controls() {
        assert_eq!(parse_command("chip 25"), Ok(PlayerCommand::Chip(25)));
        assert_eq!(parse_command("  spin "), Ok(PlayerCommand::Spin));
        assert_eq!(parse_command(""), Ok(PlayerCommand::Help));
        assert_eq!(parse_command("exit"), Ok(PlayerCommand::Quit));
        assert!(parse_command("chip lots").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_rejected_simulation_is_an_error() {
        let bet = Bet::outside(BetCategory::Red, 10);
        assert!(run_simulate(0, bet, 100, Some(1), false).is_err());
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "No spins yet...");
        assert_eq!(render_history(&[32, 0]), "32 (red)  0 (green)");
    }
}
