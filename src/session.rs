//! Session aggregation: grouping transactions, attributing them to players,
//! and reconciling each session's ledger through the settlement player.

use std::collections::HashMap;

use log::debug;

use crate::config::LedgerConfig;
use crate::dates::word_date;
use crate::error::{LedgerError, Result};
use crate::model::{round2, PlayerSessionStats, SessionStats, Transaction};

/// A session being accumulated, with an index for O(1) player lookup while
/// `players` keeps first-seen order.
struct SessionBuilder {
    stats: SessionStats,
    player_index: HashMap<String, usize>,
}

impl SessionBuilder {
    fn new(session: u32, date_label: String) -> Self {
        Self {
            stats: SessionStats::new(session, date_label),
            player_index: HashMap::new(),
        }
    }

    fn player_entry(&mut self, name: &str) -> &mut PlayerSessionStats {
        let idx = match self.player_index.get(name) {
            Some(&idx) => idx,
            None => {
                self.stats
                    .players
                    .push(PlayerSessionStats::new(name.to_string()));
                let idx = self.stats.players.len() - 1;
                self.player_index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.stats.players[idx]
    }
}

/// Group transactions into per-session statistics.
///
/// Sessions come out in the order they were first encountered; players within
/// a session in the order they first appeared. Every session must contain the
/// configured settlement player, whose payout is back-solved so that total
/// payouts equal total buy-ins.
pub fn aggregate_sessions(
    transactions: &[Transaction],
    config: &LedgerConfig,
) -> Result<Vec<SessionStats>> {
    let mut builders: Vec<SessionBuilder> = Vec::new();
    let mut session_index: HashMap<u32, usize> = HashMap::new();

    for transaction in transactions {
        let idx = match session_index.get(&transaction.session) {
            Some(&idx) => idx,
            None => {
                // The session label comes from the first row's setup date;
                // every row of a session carries the same one.
                let label = word_date(&transaction.setup_date)?;
                builders.push(SessionBuilder::new(transaction.session, label));
                let idx = builders.len() - 1;
                session_index.insert(transaction.session, idx);
                idx
            }
        };

        apply_transaction(&mut builders[idx], transaction, config)?;
    }

    builders
        .into_iter()
        .map(|b| reconcile(b, config))
        .collect()
}

fn apply_transaction(
    builder: &mut SessionBuilder,
    transaction: &Transaction,
    config: &LedgerConfig,
) -> Result<()> {
    let player = if transaction.from != config.house_account {
        transaction.from.as_str()
    } else {
        transaction.to.as_deref().ok_or_else(|| {
            LedgerError::Parse(format!(
                "house transfer in session {} names no recipient",
                transaction.session
            ))
        })?
    };
    let player = config.display_name(player);

    if transaction.is_buy_in() {
        builder.stats.total_buyins += transaction.amount;
    } else {
        builder.stats.total_payouts += transaction.amount;
    }

    let entry = builder.player_entry(player);
    if transaction.is_buy_in() {
        entry.buyins += transaction.amount;
        entry.buyin_times += 1;
    } else {
        entry.payouts += transaction.amount;
    }

    Ok(())
}

/// Back-solve the settlement player's payout so the session balances, then
/// settle every player's profit/loss.
fn reconcile(builder: SessionBuilder, config: &LedgerConfig) -> Result<SessionStats> {
    let SessionBuilder {
        mut stats,
        player_index,
    } = builder;

    let idx = *player_index
        .get(config.settlement_player.as_str())
        .ok_or_else(|| {
            LedgerError::Logic(format!(
                "settlement player '{}' never bought into session {}",
                config.settlement_player, stats.session
            ))
        })?;

    let house_buyins = stats.players[idx].buyins;
    let house_profit_loss = round2(stats.total_buyins - house_buyins - stats.total_payouts);
    stats.players[idx].payouts = round2(house_buyins + house_profit_loss);
    debug!(
        "session {}: settlement payout {:.2}",
        stats.session, stats.players[idx].payouts
    );

    // Totals are re-stated post-reconciliation so the exported session
    // balances: sum of payouts == sum of buy-ins.
    stats.total_buyins = round2(stats.total_buyins);
    stats.total_payouts = round2(stats.players.iter().map(|p| p.payouts).sum());

    for player in &mut stats.players {
        player.profit_loss = round2(player.payouts - player.buyins);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSE: &str = "Adv Plus Banking - 1686";

    fn buy_in(session: u32, setup_date: &str, player: &str, amount: f64) -> Transaction {
        Transaction {
            session,
            setup_date: setup_date.to_string(),
            effective_date: None,
            from: player.to_string(),
            to: None,
            amount,
        }
    }

    fn payout(session: u32, setup_date: &str, player: &str, amount: f64) -> Transaction {
        Transaction {
            session,
            setup_date: setup_date.to_string(),
            effective_date: None,
            from: HOUSE.to_string(),
            to: Some(player.to_string()),
            amount,
        }
    }

    #[test]
    fn test_single_session_reconciliation() {
        // Alice and the settlement player each buy in 100; Alice cashes out
        // 150. The settlement payout must absorb the remaining 50.
        let transactions = vec![
            buy_in(1, "1.3.2024", "Alice", 100.0),
            buy_in(1, "1.3.2024", "Meet", 100.0),
            payout(1, "1.3.2024", "Alice", 150.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        assert_eq!(sessions.len(), 1);

        let session = &sessions[0];
        assert_eq!(session.session, 1);
        assert_eq!(session.date_label, "3rd Jan 2024");
        assert_eq!(session.total_buyins, 200.0);
        assert_eq!(session.total_payouts, 200.0);

        let alice = session.player("Alice").unwrap();
        assert_eq!(alice.buyins, 100.0);
        assert_eq!(alice.buyin_times, 1);
        assert_eq!(alice.payouts, 150.0);
        assert_eq!(alice.profit_loss, 50.0);

        let meet = session.player("Meet").unwrap();
        assert_eq!(meet.buyins, 100.0);
        assert_eq!(meet.payouts, 50.0);
        assert_eq!(meet.profit_loss, -50.0);
    }

    #[test]
    fn test_ledger_balances_across_players() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Alice", 100.0),
            buy_in(1, "1.3.2024", "Bob", 60.0),
            buy_in(1, "1.3.2024", "Bob", 40.0),
            buy_in(1, "1.3.2024", "Meet", 75.0),
            payout(1, "1.3.2024", "Alice", 180.0),
            payout(1, "1.3.2024", "Bob", 25.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let session = &sessions[0];

        let buyin_sum: f64 = session.players.iter().map(|p| p.buyins).sum();
        let payout_sum: f64 = session.players.iter().map(|p| p.payouts).sum();
        assert!((buyin_sum - session.total_buyins).abs() < 0.01);
        assert!((payout_sum - session.total_payouts).abs() < 0.01);
        assert!((payout_sum - buyin_sum).abs() < 0.01);

        for player in &session.players {
            assert_eq!(player.profit_loss, round2(player.payouts - player.buyins));
        }

        // Net across the table is zero
        let net: f64 = session.players.iter().map(|p| p.profit_loss).sum();
        assert!(net.abs() < 0.01);
    }

    #[test]
    fn test_buyin_times_counts_rebuys() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Meet", 50.0),
            buy_in(1, "1.3.2024", "Alice", 50.0),
            buy_in(1, "1.3.2024", "Alice", 50.0),
            buy_in(1, "1.3.2024", "Alice", 50.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let alice = sessions[0].player("Alice").unwrap();
        assert_eq!(alice.buyin_times, 3);
        assert_eq!(alice.buyins, 150.0);
    }

    #[test]
    fn test_sessions_keep_encounter_order() {
        let transactions = vec![
            buy_in(7, "1.10.2024", "Meet", 50.0),
            buy_in(3, "1.3.2024", "Meet", 50.0),
            buy_in(7, "1.10.2024", "Alice", 50.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let order: Vec<u32> = sessions.iter().map(|s| s.session).collect();
        assert_eq!(order, vec![7, 3]);
        assert_eq!(sessions[0].date_label, "10th Jan 2024");
        assert_eq!(sessions[1].date_label, "3rd Jan 2024");
    }

    #[test]
    fn test_players_keep_first_seen_order() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Carol", 50.0),
            buy_in(1, "1.3.2024", "Meet", 50.0),
            buy_in(1, "1.3.2024", "Alice", 50.0),
            payout(1, "1.3.2024", "Carol", 20.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let names: Vec<&str> = sessions[0].players.iter().map(|p| p.player.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Meet", "Alice"]);
    }

    #[test]
    fn test_payout_only_player_gets_entry() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Meet", 100.0),
            payout(1, "1.3.2024", "Dave", 30.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let dave = sessions[0].player("Dave").unwrap();
        assert_eq!(dave.buyins, 0.0);
        assert_eq!(dave.buyin_times, 0);
        assert_eq!(dave.payouts, 30.0);
        assert_eq!(dave.profit_loss, 30.0);
    }

    #[test]
    fn test_alias_applied_before_aggregation() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Meet", 50.0),
            buy_in(1, "1.3.2024", "Dharmik", 50.0),
            payout(1, "1.3.2024", "Dharmik", 80.0),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let session = &sessions[0];

        // Raw name never surfaces; buy-in and payout land on the same entry
        assert!(session.player("Dharmik").is_none());
        let anon = session.player("D_Anonymous").unwrap();
        assert_eq!(anon.buyins, 50.0);
        assert_eq!(anon.payouts, 80.0);
    }

    #[test]
    fn test_missing_settlement_player_is_fatal() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Alice", 100.0),
            payout(1, "1.3.2024", "Alice", 100.0),
        ];

        let err = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap_err();
        assert!(matches!(err, LedgerError::Logic(_)));
        assert!(err.to_string().contains("session 1"));
    }

    #[test]
    fn test_malformed_setup_date_is_fatal() {
        let transactions = vec![buy_in(1, "January 3rd", "Meet", 100.0)];
        let err = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap_err();
        assert!(matches!(err, LedgerError::Format(_)));
    }

    #[test]
    fn test_house_transfer_without_recipient_is_fatal() {
        let mut t = buy_in(1, "1.3.2024", "Meet", 100.0);
        t.from = HOUSE.to_string();
        let err = aggregate_sessions(&[t], &LedgerConfig::default()).unwrap_err();
        assert!(matches!(err, LedgerError::Parse(_)));
    }

    #[test]
    fn test_cent_amounts_round_cleanly() {
        let transactions = vec![
            buy_in(1, "1.3.2024", "Alice", 33.33),
            buy_in(1, "1.3.2024", "Bob", 33.33),
            buy_in(1, "1.3.2024", "Meet", 33.34),
            payout(1, "1.3.2024", "Alice", 50.05),
        ];

        let sessions = aggregate_sessions(&transactions, &LedgerConfig::default()).unwrap();
        let session = &sessions[0];
        assert_eq!(session.total_buyins, 100.0);

        let meet = session.player("Meet").unwrap();
        // 100.00 - 33.34 - 50.05 = 16.61 profit; payout = 33.34 + 16.61
        assert_eq!(meet.payouts, 49.95);
        assert_eq!(meet.profit_loss, 16.61);
        assert_eq!(session.total_payouts, 100.0);
    }
}
