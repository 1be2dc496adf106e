use std::ops::RangeInclusive;

use crate::domain::errors::DomainError;

pub const MIN_PLAYERS: u8 = 3;
pub const MAX_PLAYERS: u8 = 7;
pub const DECK_SIZE: usize = 52;

pub fn valid_bid_range(hand_size: u8) -> RangeInclusive<u8> {
    0..=hand_size
}

/// Default hand-size schedule: 7 down to 1, then back up to 7.
///
/// The prototype this engine replaces disagreed with itself about the
/// schedule, so it is configuration, not a constant; this default merely has
/// to be playable for the whole 3..=7 player range (7 * 7 = 49 <= 51, leaving
/// an upcard).
pub fn default_schedule() -> Vec<u8> {
    vec![7, 6, 5, 4, 3, 2, 1, 2, 3, 4, 5, 6, 7]
}

/// Validate a hand-size schedule against a seated player count.
///
/// A round that deals the whole deck is legal; the upcard trump policy
/// simply falls back to no-trump then.
pub fn validate_schedule(schedule: &[u8], player_count: u8) -> Result<(), DomainError> {
    if schedule.is_empty() {
        return Err(DomainError::InvalidSchedule(
            "schedule must contain at least one round".into(),
        ));
    }
    for (i, &hand_size) in schedule.iter().enumerate() {
        if hand_size == 0 {
            return Err(DomainError::InvalidSchedule(format!(
                "round {} deals zero cards",
                i + 1
            )));
        }
        let needed = hand_size as usize * player_count as usize;
        if needed > DECK_SIZE {
            return Err(DomainError::InvalidSchedule(format!(
                "round {} needs {needed} cards for {player_count} players, deck has {DECK_SIZE}",
                i + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_range_matches_hand_size() {
        for hs in 0..=13u8 {
            let r = valid_bid_range(hs);
            assert_eq!(*r.start(), 0);
            assert_eq!(*r.end(), hs);
        }
    }

    #[test]
    fn default_schedule_fits_every_player_count() {
        let schedule = default_schedule();
        for players in MIN_PLAYERS..=MAX_PLAYERS {
            validate_schedule(&schedule, players).unwrap();
        }
    }

    #[test]
    fn schedule_rejects_overdraw() {
        // 8 cards * 7 players = 56 > 52
        assert!(validate_schedule(&[8], 7).is_err());
        // 13 * 4 = 52 is the whole deck and still legal
        assert!(validate_schedule(&[13], 4).is_ok());
    }

    #[test]
    fn schedule_rejects_empty_and_zero_rounds() {
        assert!(validate_schedule(&[], 4).is_err());
        assert!(validate_schedule(&[3, 0, 3], 4).is_err());
    }
}
