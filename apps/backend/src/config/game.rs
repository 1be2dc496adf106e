//! Engine configuration: schedule, trump policy, disconnect handling,
//! tie-break. All of it is fixed per engine instance and validated against
//! the seated player count when a game starts.

use std::time::Duration;

use crate::domain::dealing::TrumpPolicy;
use crate::domain::scoring::TieBreak;
use crate::domain::{default_schedule, validate_schedule, DomainError};
use crate::error::AppError;

/// What happens when the player on turn is disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectPolicy {
    /// The round blocks until the player reconnects.
    Block,
    /// After the grace period the engine acts for the player: lowest legal
    /// bid, lowest legal card.
    AutoAct { grace: Duration },
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Cards per hand for each scheduled round, in play order.
    pub schedule: Vec<u8>,
    pub trump_policy: TrumpPolicy,
    pub disconnect_policy: DisconnectPolicy,
    pub tie_break: TieBreak,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            trump_policy: TrumpPolicy::UpCard,
            disconnect_policy: DisconnectPolicy::Block,
            tie_break: TieBreak::FewestBidMisses,
        }
    }
}

impl GameConfig {
    /// Build the config from `BACKEND_*` environment variables, falling back
    /// to defaults for anything unset.
    ///
    /// - `BACKEND_HAND_SCHEDULE`: comma-separated hand sizes, e.g. `7,6,5,4`
    /// - `BACKEND_TRUMP_POLICY`: `up_card` | `dealer_last_card`
    /// - `BACKEND_TURN_GRACE_SECS`: enables auto-act after that many seconds
    /// - `BACKEND_TIE_BREAK`: `fewest_bid_misses` | `lowest_seat`
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("BACKEND_HAND_SCHEDULE") {
            config.schedule = raw
                .split(',')
                .map(|s| s.trim().parse::<u8>())
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|e| {
                    AppError::config(format!("BACKEND_HAND_SCHEDULE must be u8 list: {e}"))
                })?;
        }

        if let Ok(raw) = std::env::var("BACKEND_TRUMP_POLICY") {
            config.trump_policy = match raw.as_str() {
                "up_card" => TrumpPolicy::UpCard,
                "dealer_last_card" => TrumpPolicy::DealerLastCard,
                other => {
                    return Err(AppError::config(format!(
                        "BACKEND_TRUMP_POLICY: unknown policy {other:?}"
                    )))
                }
            };
        }

        if let Ok(raw) = std::env::var("BACKEND_TURN_GRACE_SECS") {
            let secs: u64 = raw.parse().map_err(|e| {
                AppError::config(format!("BACKEND_TURN_GRACE_SECS must be seconds: {e}"))
            })?;
            config.disconnect_policy = DisconnectPolicy::AutoAct {
                grace: Duration::from_secs(secs),
            };
        }

        if let Ok(raw) = std::env::var("BACKEND_TIE_BREAK") {
            config.tie_break = match raw.as_str() {
                "fewest_bid_misses" => TieBreak::FewestBidMisses,
                "lowest_seat" => TieBreak::LowestSeat,
                other => {
                    return Err(AppError::config(format!(
                        "BACKEND_TIE_BREAK: unknown rule {other:?}"
                    )))
                }
            };
        }

        Ok(config)
    }

    /// Validate the schedule for a concrete table size.
    pub fn validate_for_players(&self, player_count: u8) -> Result<(), DomainError> {
        validate_schedule(&self.schedule, player_count)
    }

    /// Total number of scheduled rounds.
    pub fn total_rounds(&self) -> u8 {
        self.schedule.len() as u8
    }

    /// Hand size for a 1-based round number, None past the schedule's end.
    pub fn hand_size_for_round(&self, round_no: u8) -> Option<u8> {
        if round_no == 0 {
            return None;
        }
        self.schedule.get(round_no as usize - 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_for_all_table_sizes() {
        let config = GameConfig::default();
        for players in 3..=7u8 {
            config.validate_for_players(players).unwrap();
        }
    }

    #[test]
    fn schedule_lookup_is_one_based_and_bounded() {
        let config = GameConfig {
            schedule: vec![3, 2, 1],
            ..GameConfig::default()
        };
        assert_eq!(config.hand_size_for_round(0), None);
        assert_eq!(config.hand_size_for_round(1), Some(3));
        assert_eq!(config.hand_size_for_round(3), Some(1));
        assert_eq!(config.hand_size_for_round(4), None);
        assert_eq!(config.total_rounds(), 3);
    }
}
