/// Round a currency value to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One player's accumulated totals within a single session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSessionStats {
    pub player: String,
    pub buyin_times: u32,
    pub buyins: f64,
    pub payouts: f64,
    pub profit_loss: f64,
}

impl PlayerSessionStats {
    pub fn new(player: String) -> Self {
        Self {
            player,
            buyin_times: 0,
            buyins: 0.0,
            payouts: 0.0,
            profit_loss: 0.0,
        }
    }
}

/// Aggregated statistics for one poker session.
///
/// `players` holds one entry per distinct player, in the order each was
/// first seen in the statement.
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub session: u32,
    pub date_label: String,
    pub total_buyins: f64,
    pub total_payouts: f64,
    pub players: Vec<PlayerSessionStats>,
}

impl SessionStats {
    pub fn new(session: u32, date_label: String) -> Self {
        Self {
            session,
            date_label,
            total_buyins: 0.0,
            total_payouts: 0.0,
            players: Vec::new(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerSessionStats> {
        self.players.iter().find(|p| p.player == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(100.0), 100.0);
        // Float accumulation noise collapses back to cents
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_player_lookup() {
        let mut session = SessionStats::new(1, "3rd Jan 2024".to_string());
        session.players.push(PlayerSessionStats::new("Alice".to_string()));

        assert!(session.player("Alice").is_some());
        assert!(session.player("Bob").is_none());
    }
}
