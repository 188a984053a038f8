//! Flattening session statistics into the exported table.
//!
//! The output is one CSV row per (session, player), the only artifact this
//! tool persists. The reader half of the module is the same contract the
//! downstream dashboard consumes: all seven columns, typed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::SessionStats;

/// One row of the exported statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    #[serde(rename = "Session Number")]
    pub session: u32,
    #[serde(rename = "Session Date")]
    pub session_date: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "BuyIn_Times")]
    pub buyin_times: u32,
    #[serde(rename = "BuyIns")]
    pub buyins: f64,
    #[serde(rename = "Payouts")]
    pub payouts: f64,
    #[serde(rename = "ProfitLoss")]
    pub profit_loss: f64,
}

/// Flatten sessions into rows, preserving session order and each session's
/// player insertion order.
pub fn flatten(sessions: &[SessionStats]) -> Vec<StatRow> {
    let mut rows = Vec::new();

    for session in sessions {
        for player in &session.players {
            rows.push(StatRow {
                session: session.session,
                session_date: session.date_label.clone(),
                player: player.player.clone(),
                buyin_times: player.buyin_times,
                buyins: player.buyins,
                payouts: player.payouts,
                profit_loss: player.profit_loss,
            });
        }
    }

    rows
}

/// Write the statistics table, replacing any existing file.
pub fn write_stats_file(rows: &[StatRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a previously exported statistics table.
pub fn read_stats_file(path: &Path) -> Result<Vec<StatRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}
