//! Deterministic card dealing and trump establishment.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::DECK_SIZE;
use crate::domain::state::Seat;
use crate::domain::{Card, Rank, Suit, Trump};

/// How trump is established after dealing. Fixed per engine instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrumpPolicy {
    /// Turn the first undealt card; its suit is trump. No card left means
    /// no trump this round.
    UpCard,
    /// The suit of the last card dealt to the dealer.
    DealerLastCard,
}

/// Outcome of dealing one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealtRound {
    /// Sorted hands by seat.
    pub hands: Vec<Vec<Card>>,
    pub trump: Trump,
    /// The turned card, when the policy turns one.
    pub upcard: Option<Card>,
}

/// Full 52-card deck in canonical order.
fn full_deck() -> Vec<Card> {
    let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
    let ranks = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in suits {
        for rank in ranks {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Shuffled deck for a seed: same seed, same ordering.
pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = full_deck();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    deck
}

/// Deal one round deterministically.
///
/// Each seat gets `hand_size` consecutive cards off the shuffled deck; hands
/// come back sorted. Asking for more cards than the deck holds is a
/// programming error (the schedule is validated at game start), reported as
/// a fatal [`DomainError::InsufficientCards`] rather than a recoverable one.
pub fn deal_round(
    player_count: u8,
    hand_size: u8,
    dealer: Seat,
    seed: u64,
    policy: TrumpPolicy,
) -> Result<DealtRound, DomainError> {
    let n = player_count as usize;
    let per_hand = hand_size as usize;
    let total = n * per_hand;
    if total > DECK_SIZE {
        return Err(DomainError::InsufficientCards {
            requested: total,
            remaining: DECK_SIZE,
        });
    }

    let deck = shuffled_deck(seed);

    let mut hands: Vec<Vec<Card>> = Vec::with_capacity(n);
    for seat in 0..n {
        let start = seat * per_hand;
        let mut hand = deck[start..start + per_hand].to_vec();
        hand.sort();
        hands.push(hand);
    }

    let (trump, upcard) = match policy {
        TrumpPolicy::UpCard => match deck.get(total).copied() {
            Some(card) => (Trump::from(card.suit), Some(card)),
            None => (Trump::NoTrump, None),
        },
        TrumpPolicy::DealerLastCard => {
            // Last card of the dealer's block, before sorting.
            let last = deck[dealer as usize * per_hand + per_hand - 1];
            (Trump::from(last.suit), None)
        }
    };

    Ok(DealtRound {
        hands,
        trump,
        upcard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn shuffle_is_deterministic() {
        assert_eq!(shuffled_deck(12345), shuffled_deck(12345));
        assert_ne!(shuffled_deck(12345), shuffled_deck(54321));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        for seed in [0u64, 1, 42, u64::MAX] {
            let deck = shuffled_deck(seed);
            assert_eq!(deck.len(), DECK_SIZE);
            let distinct: HashSet<Card> = deck.iter().copied().collect();
            assert_eq!(distinct.len(), DECK_SIZE, "seed {seed} produced duplicates");
        }
    }

    #[test]
    fn deal_is_deterministic() {
        let a = deal_round(4, 5, 0, 12345, TrumpPolicy::UpCard).unwrap();
        let b = deal_round(4, 5, 0, 12345, TrumpPolicy::UpCard).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deal_produces_sorted_disjoint_hands() {
        let dealt = deal_round(7, 7, 2, 99999, TrumpPolicy::UpCard).unwrap();
        assert_eq!(dealt.hands.len(), 7);
        let mut seen: HashSet<Card> = HashSet::new();
        for hand in &dealt.hands {
            assert_eq!(hand.len(), 7);
            let mut sorted = hand.clone();
            sorted.sort();
            assert_eq!(hand, &sorted);
            for card in hand {
                assert!(seen.insert(*card), "duplicate card {card:?} dealt");
            }
        }
        // The upcard is not in anyone's hand.
        let upcard = dealt.upcard.expect("cards remain, upcard must be turned");
        assert!(!seen.contains(&upcard));
        assert_eq!(dealt.trump, Trump::from(upcard.suit));
    }

    #[test]
    fn upcard_policy_with_exhausted_deck_means_no_trump() {
        // 13 * 4 = 52: nothing left to turn.
        let dealt = deal_round(4, 13, 0, 7, TrumpPolicy::UpCard).unwrap();
        assert_eq!(dealt.trump, Trump::NoTrump);
        assert_eq!(dealt.upcard, None);
    }

    #[test]
    fn dealer_last_card_policy_uses_dealer_hand() {
        let seed = 4242;
        let dealer: Seat = 3;
        let hand_size = 6u8;
        let dealt = deal_round(5, hand_size, dealer, seed, TrumpPolicy::DealerLastCard).unwrap();
        let deck = shuffled_deck(seed);
        let last_dealt = deck[dealer as usize * hand_size as usize + hand_size as usize - 1];
        assert_eq!(dealt.trump, Trump::from(last_dealt.suit));
        assert_eq!(dealt.upcard, None);
    }

    #[test]
    fn overdraw_is_rejected() {
        let err = deal_round(7, 8, 0, 1, TrumpPolicy::UpCard).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientCards { .. }));
        assert!(err.is_fatal());
    }
}
