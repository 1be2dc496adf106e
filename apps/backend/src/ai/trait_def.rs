//! Auto-action policy trait definition.

use std::fmt;

use crate::domain::state::Seat;
use crate::domain::{Card, GameState};

/// Errors that can occur during policy decision-making.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The seat has no legal action in the current state.
    NoLegalAction,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::NoLegalAction => write!(f, "no legal action available"),
        }
    }
}

impl std::error::Error for PolicyError {}

/// A policy chooses actions for a seat the engine must act for.
///
/// Implementations must select from the legal sets
/// ([`crate::domain::bidding::legal_bids`],
/// [`crate::domain::tricks::legal_moves`]); legality is the engine's
/// contract, cleverness is not.
pub trait Policy: Send + Sync {
    /// Choose a bid for the seat during the Bidding phase.
    fn choose_bid(&self, state: &GameState, seat: Seat) -> Result<u8, PolicyError>;

    /// Choose a card for the seat during the Playing phase.
    fn choose_play(&self, state: &GameState, seat: Seat) -> Result<Card, PolicyError>;
}
