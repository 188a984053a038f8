use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use poker_ledger::config::LedgerConfig;
use poker_ledger::model::round2;
use poker_ledger::{export, report, session, statement};

#[derive(Parser)]
#[command(name = "poker-ledger")]
#[command(about = "Compute per-session poker player statistics from a bank statement export", long_about = None)]
struct Cli {
    /// TOML config overriding the built-in account and player tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-session player statistics and export them as CSV
    Compute {
        /// Bank statement export (CSV)
        input: PathBuf,

        /// Output statistics file
        #[arg(short, long, default_value = "player_statistics_by_session.csv")]
        output: PathBuf,
    },

    /// Display a per-session summary of a statement file
    Info {
        /// Bank statement export (CSV)
        input: PathBuf,
    },

    /// Recompute statistics and check that every session's ledger balances
    Validate {
        /// Bank statement export (CSV)
        input: PathBuf,
    },

    /// Show the global leaderboard from an exported statistics file
    Leaderboard {
        /// Exported statistics file
        #[arg(default_value = "player_statistics_by_session.csv")]
        stats: PathBuf,
    },

    /// Show one player's history from an exported statistics file
    Player {
        /// Player display name
        name: String,

        /// Exported statistics file
        #[arg(default_value = "player_statistics_by_session.csv")]
        stats: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Compute { input, output } => {
            compute(&input, &output, &config)?;
        }
        Commands::Info { input } => {
            info(&input, &config)?;
        }
        Commands::Validate { input } => {
            validate(&input, &config)?;
        }
        Commands::Leaderboard { stats } => {
            show_leaderboard(&stats, &config)?;
        }
        Commands::Player { name, stats } => {
            show_player(&stats, &name, &config)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LedgerConfig> {
    match path {
        Some(path) => {
            println!("Loading config: {}", path.display());
            LedgerConfig::from_file(path).context("Failed to load config file")
        }
        None => Ok(LedgerConfig::default()),
    }
}

fn load_sessions(
    input: &Path,
    config: &LedgerConfig,
) -> Result<(usize, Vec<poker_ledger::SessionStats>)> {
    let transactions =
        statement::read_statement_file(input).context("Failed to read statement file")?;
    let sessions = session::aggregate_sessions(&transactions, config)
        .context("Failed to aggregate sessions")?;
    Ok((transactions.len(), sessions))
}

fn compute(input: &Path, output: &Path, config: &LedgerConfig) -> Result<()> {
    println!("Reading statement file: {}", input.display());
    let (transaction_count, sessions) = load_sessions(input, config)?;
    println!("Found {} transactions", transaction_count);
    println!("Found {} sessions", sessions.len());

    let rows = export::flatten(&sessions);
    println!("Writing statistics file: {}", output.display());
    export::write_stats_file(&rows, output).context("Failed to write statistics file")?;
    println!("Wrote {} player-session rows", rows.len());

    println!("Done!");
    Ok(())
}

fn info(input: &Path, config: &LedgerConfig) -> Result<()> {
    println!("Statement: {}", input.display());
    let (transaction_count, sessions) = load_sessions(input, config)?;
    println!("Transactions: {}", transaction_count);
    println!("Sessions: {}", sessions.len());
    println!();

    for session in &sessions {
        println!("Session {} ({})", session.session, session.date_label);
        println!(
            "  Buy-ins: ${:.2}  Payouts: ${:.2}",
            session.total_buyins, session.total_payouts
        );
        for player in &session.players {
            println!(
                "  {:<20} {:>2}x  in ${:>9.2}  out ${:>9.2}  net ${:>9.2}",
                player.player, player.buyin_times, player.buyins, player.payouts,
                player.profit_loss
            );
        }
        println!();
    }

    Ok(())
}

fn validate(input: &Path, config: &LedgerConfig) -> Result<()> {
    let (transaction_count, sessions) = load_sessions(input, config)?;
    println!("Statement file is valid");
    println!("  {} transactions", transaction_count);
    println!("  {} sessions", sessions.len());

    let mut issues = Vec::new();
    for session in &sessions {
        let buyin_sum: f64 = session.players.iter().map(|p| p.buyins).sum();
        let payout_sum: f64 = session.players.iter().map(|p| p.payouts).sum();

        if (buyin_sum - session.total_buyins).abs() > 0.01 {
            issues.push(format!(
                "Session {}: player buy-ins sum to {:.2}, session total is {:.2}",
                session.session, buyin_sum, session.total_buyins
            ));
        }
        if (payout_sum - buyin_sum).abs() > 0.01 {
            issues.push(format!(
                "Session {}: payouts {:.2} do not balance buy-ins {:.2}",
                session.session, payout_sum, buyin_sum
            ));
        }
        for player in &session.players {
            if player.profit_loss != round2(player.payouts - player.buyins) {
                issues.push(format!(
                    "Session {}: {} profit/loss {:.2} does not match payouts - buy-ins",
                    session.session, player.player, player.profit_loss
                ));
            }
        }
    }

    if issues.is_empty() {
        println!("  No issues found");
    } else {
        println!("  Issues found:");
        for issue in issues {
            println!("    - {}", issue);
        }
    }

    Ok(())
}

fn show_leaderboard(stats: &Path, config: &LedgerConfig) -> Result<()> {
    println!("Reading statistics file: {}", stats.display());
    let rows = export::read_stats_file(stats).context("Failed to read statistics file")?;
    let rows = report::filter_hidden(&rows, config);
    let global = report::global_stats(&rows);

    println!();
    println!("Sessions: {}", global.sessions);
    println!("Total buy-ins: ${:.2}", global.total_buyins);
    println!(
        "Average buy-ins per session: ${:.2}",
        global.avg_buyins_per_session
    );
    println!("Largest pot: ${:.2}", global.largest_pot);
    if let Some(player) = &global.most_profitable {
        println!("Most profitable player: {}", player);
    }
    if let Some(player) = &global.most_losses {
        println!("Most losses: {}", player);
    }

    println!();
    println!(
        "{:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "Player", "Sessions", "BuyIns", "Payouts", "ProfitLoss", "Variance", "Median"
    );
    for entry in report::leaderboard(&rows) {
        let variance = entry
            .profit_variance
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12} {:>10.2}",
            entry.player,
            entry.sessions_played,
            entry.buyins,
            entry.payouts,
            entry.profit_loss,
            variance,
            entry.median_profit
        );
    }

    Ok(())
}

fn show_player(stats: &Path, name: &str, config: &LedgerConfig) -> Result<()> {
    println!("Reading statistics file: {}", stats.display());
    let rows = export::read_stats_file(stats).context("Failed to read statistics file")?;
    let rows = report::filter_hidden(&rows, config);

    let summary = report::player_summary(&rows, name)
        .with_context(|| format!("No sessions found for player '{}'", name))?;

    println!();
    println!("Statistics for {}", summary.player);
    println!("  Sessions played: {}", summary.sessions_played);
    println!("  Times bought in: {}", summary.buyin_times);
    println!("  Total buy-ins: ${:.2}", summary.buyins);
    println!("  Total payouts: ${:.2}", summary.payouts);
    println!("  Net profit/loss: ${:.2}", summary.profit_loss);
    println!("  Best session: ${:.2}", summary.best_session);
    println!("  Worst session: ${:.2}", summary.worst_session);
    println!(
        "  Longest winning streak: {} sessions",
        summary.longest_win_streak
    );
    println!(
        "  Longest losing streak: {} sessions",
        summary.longest_loss_streak
    );
    println!(
        "  Average profit: ${:.2} (table average {:.2})",
        summary.profit_loss / summary.sessions_played as f64,
        report::mean_profit(&rows)
    );

    println!();
    println!(
        "  {:<8} {:<16} {:>4} {:>10} {:>10} {:>10} {:>12}",
        "Session", "Date", "In", "BuyIns", "Payouts", "Net", "Cumulative"
    );
    for (row, (_, total)) in rows
        .iter()
        .filter(|r| r.player == summary.player)
        .zip(&summary.cumulative)
    {
        println!(
            "  {:<8} {:<16} {:>4} {:>10.2} {:>10.2} {:>10.2} {:>12.2}",
            row.session,
            row.session_date,
            row.buyin_times,
            row.buyins,
            row.payouts,
            row.profit_loss,
            total
        );
    }

    Ok(())
}
