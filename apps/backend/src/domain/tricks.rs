//! Trick play: legality, turn enforcement, and winner resolution.

use crate::domain::errors::DomainError;
use crate::domain::state::{
    check_card_conservation, next_seat, require_hand_size, require_turn, GameState, Phase,
    RoundState, Seat,
};
use crate::domain::{card_beats, hand_has_suit, Card, Trump};

/// Result of playing a card, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCardResult {
    /// Whether this play completed a trick (one card per seat).
    pub trick_completed: bool,
    /// Winner of the completed trick, if one was completed.
    pub trick_winner: Option<Seat>,
    /// Trick number this play belonged to.
    pub trick_no: u8,
    /// Whether this was the round's final trick; the state is now in
    /// RoundScoring and waits for the lifecycle to tally and advance.
    pub round_complete: bool,
}

/// Legal cards the seat may play, independent of turn enforcement.
///
/// No lead suit yet (or void in the lead suit) means the whole hand is
/// legal; otherwise only lead-suit cards are.
pub fn legal_moves(state: &GameState, who: Seat) -> Vec<Card> {
    let Phase::Playing { .. } = state.phase else {
        return Vec::new();
    };

    let hand = &state.hands[who as usize];
    if hand.is_empty() {
        return Vec::new();
    }

    if let Some(lead) = state.round.trick_lead {
        if hand_has_suit(hand, lead) {
            let mut v: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead).collect();
            v.sort();
            return v;
        }
    }

    let mut any = hand.clone();
    any.sort();
    any
}

/// Play a card into the current trick, enforcing phase, turn, and
/// suit-following. Illegal plays never enter the trick.
pub fn play_card(
    state: &mut GameState,
    who: Seat,
    card: Card,
) -> Result<PlayCardResult, DomainError> {
    let Phase::Playing { trick_no } = state.phase else {
        return Err(DomainError::WrongPhase);
    };

    let turn = require_turn(state, "play_card")?;
    if turn != who {
        return Err(DomainError::OutOfTurn);
    }

    // Card in hand (immutable check first to avoid borrow conflicts)
    let pos_opt = state.hands[who as usize].iter().position(|&c| c == card);
    let Some(pos) = pos_opt else {
        return Err(DomainError::CardNotInHand);
    };

    if !legal_moves(state, who).contains(&card) {
        return Err(DomainError::MustFollowSuit);
    }

    // On first play, set lead and remember who led this trick.
    if state.round.trick_plays.is_empty() {
        state.round.trick_lead = Some(card.suit);
        state.leader = Some(who);
    }

    let removed = state.hands[who as usize].remove(pos);
    state.round.trick_plays.push((who, removed));

    state.turn = Some(next_seat(who, state.player_count));

    let trick_completed = state.round.trick_plays.len() == state.player_count as usize;
    let mut result = PlayCardResult {
        trick_completed,
        trick_winner: None,
        trick_no,
        round_complete: false,
    };

    if !trick_completed {
        check_card_conservation(state)?;
        return Ok(result);
    }

    // Resolve completed trick: winner collects it and leads the next one.
    let winner = resolve_current_trick(&state.round).ok_or_else(|| {
        DomainError::invariant("completed trick did not resolve to a winner")
    })?;
    state.round.tricks_won[winner as usize] += 1;
    state.leader = Some(winner);
    state.turn = Some(winner);
    result.trick_winner = Some(winner);

    let plays = std::mem::take(&mut state.round.trick_plays);
    state.round.resolved.push(plays);
    state.round.trick_lead = None;

    let hand_size = require_hand_size(state, "play_card trick_complete")?;
    if trick_no >= hand_size {
        state.phase = Phase::RoundScoring;
        state.turn = None;
        state.leader = None;
        result.round_complete = true;
    } else {
        state.phase = Phase::Playing {
            trick_no: trick_no + 1,
        };
    }

    check_card_conservation(state)?;
    Ok(result)
}

/// Resolve the current trick winner if every seat has played.
pub fn resolve_current_trick(round: &RoundState) -> Option<Seat> {
    if round.trick_plays.len() < round.tricks_won.len() {
        return None;
    }
    let lead = round.trick_lead?;
    let trump = round.trump.unwrap_or(Trump::NoTrump);

    let mut best_idx = 0usize;
    for i in 1..round.trick_plays.len() {
        let (_, card_i) = round.trick_plays[i];
        let (_, card_best) = round.trick_plays[best_idx];
        if card_beats(card_i, card_best, lead, trump) {
            best_idx = i;
        }
    }
    Some(round.trick_plays[best_idx].0)
}
