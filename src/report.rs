//! Derived aggregates over the exported statistics table.
//!
//! Everything here is computed purely from `StatRow`s read back from the
//! output file, the same contract the dashboard consumes. No coupling back
//! into the aggregator.

use std::collections::HashMap;

use crate::config::LedgerConfig;
use crate::export::StatRow;
use crate::model::round2;

/// One player's line on the global leaderboard.
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub player: String,
    pub sessions_played: usize,
    pub buyins: f64,
    pub payouts: f64,
    pub profit_loss: f64,
    /// Sample variance of per-session profit; `None` with fewer than two
    /// sessions.
    pub profit_variance: Option<f64>,
    pub median_profit: f64,
}

/// Table-wide figures for the leaderboard banner.
#[derive(Debug, Clone)]
pub struct GlobalStats {
    pub sessions: usize,
    pub total_buyins: f64,
    pub avg_buyins_per_session: f64,
    pub largest_pot: f64,
    pub most_profitable: Option<String>,
    pub most_losses: Option<String>,
}

/// Per-player drill-down over every session they appear in.
#[derive(Debug, Clone)]
pub struct PlayerSummary {
    pub player: String,
    pub sessions_played: usize,
    pub buyin_times: u32,
    pub buyins: f64,
    pub payouts: f64,
    pub profit_loss: f64,
    pub best_session: f64,
    pub worst_session: f64,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
    /// (session, running profit) series in table order.
    pub cumulative: Vec<(u32, f64)>,
}

/// Drop rows for players the config hides from display.
pub fn filter_hidden(rows: &[StatRow], config: &LedgerConfig) -> Vec<StatRow> {
    rows.iter()
        .filter(|r| !config.is_hidden(&r.player))
        .cloned()
        .collect()
}

/// Rank every player by total profit, descending.
pub fn leaderboard(rows: &[StatRow]) -> Vec<LeaderboardEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&StatRow>> = HashMap::new();

    for row in rows {
        let group = grouped.entry(row.player.as_str()).or_insert_with(|| {
            order.push(row.player.as_str());
            Vec::new()
        });
        group.push(row);
    }

    let mut entries: Vec<LeaderboardEntry> = order
        .iter()
        .map(|player| {
            let player_rows = &grouped[player];
            let profits: Vec<f64> = player_rows.iter().map(|r| r.profit_loss).collect();

            LeaderboardEntry {
                player: player.to_string(),
                sessions_played: distinct_sessions(player_rows),
                buyins: round2(player_rows.iter().map(|r| r.buyins).sum()),
                payouts: round2(player_rows.iter().map(|r| r.payouts).sum()),
                profit_loss: round2(profits.iter().sum()),
                profit_variance: sample_variance(&profits),
                median_profit: median(&profits),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.profit_loss.total_cmp(&a.profit_loss));
    entries
}

/// Compute the banner figures for the whole table.
pub fn global_stats(rows: &[StatRow]) -> GlobalStats {
    let mut pots: HashMap<u32, f64> = HashMap::new();
    for row in rows {
        *pots.entry(row.session).or_insert(0.0) += row.buyins;
    }

    let sessions = pots.len();
    let total_buyins: f64 = rows.iter().map(|r| r.buyins).sum();
    let largest_pot = pots.values().fold(0.0f64, |max, &pot| max.max(pot));

    let ranked = leaderboard(rows);
    let most_profitable = ranked.first().map(|e| e.player.clone());
    let most_losses = ranked.last().map(|e| e.player.clone());

    GlobalStats {
        sessions,
        total_buyins: round2(total_buyins),
        avg_buyins_per_session: if sessions > 0 {
            round2(total_buyins / sessions as f64)
        } else {
            0.0
        },
        largest_pot: round2(largest_pot),
        most_profitable,
        most_losses,
    }
}

/// Summarize one player's history; `None` if they never appear.
pub fn player_summary(rows: &[StatRow], name: &str) -> Option<PlayerSummary> {
    let player_rows: Vec<&StatRow> = rows.iter().filter(|r| r.player == name).collect();
    if player_rows.is_empty() {
        return None;
    }

    let mut cumulative = Vec::with_capacity(player_rows.len());
    let mut running = 0.0;
    for row in &player_rows {
        running += row.profit_loss;
        cumulative.push((row.session, round2(running)));
    }

    let profits: Vec<f64> = player_rows.iter().map(|r| r.profit_loss).collect();
    let (win_streak, loss_streak) = streaks(&profits);

    Some(PlayerSummary {
        player: name.to_string(),
        sessions_played: distinct_sessions(&player_rows),
        buyin_times: player_rows.iter().map(|r| r.buyin_times).sum(),
        buyins: round2(player_rows.iter().map(|r| r.buyins).sum()),
        payouts: round2(player_rows.iter().map(|r| r.payouts).sum()),
        profit_loss: round2(profits.iter().sum()),
        best_session: profits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        worst_session: profits.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
        longest_win_streak: win_streak,
        longest_loss_streak: loss_streak,
        cumulative,
    })
}

/// Mean per-session profit across all rows (global comparison figure).
pub fn mean_profit(rows: &[StatRow]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    round2(rows.iter().map(|r| r.profit_loss).sum::<f64>() / rows.len() as f64)
}

fn distinct_sessions(rows: &[&StatRow]) -> usize {
    let mut seen: Vec<u32> = rows.iter().map(|r| r.session).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Longest runs of consecutive winning and losing sessions. A break-even
/// session ends both runs.
fn streaks(profits: &[f64]) -> (usize, usize) {
    let mut win_run = 0;
    let mut loss_run = 0;
    let mut best_win = 0;
    let mut best_loss = 0;

    for &profit in profits {
        if profit > 0.0 {
            win_run += 1;
            loss_run = 0;
        } else if profit < 0.0 {
            loss_run += 1;
            win_run = 0;
        } else {
            win_run = 0;
            loss_run = 0;
        }
        best_win = best_win.max(win_run);
        best_loss = best_loss.max(loss_run);
    }

    (best_win, best_loss)
}

/// Sample variance (n-1 denominator); `None` below two observations.
fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(round2(sum_sq / (n - 1.0)))
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        round2((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
