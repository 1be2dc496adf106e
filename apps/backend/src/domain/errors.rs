use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rule violations and protocol-level rejections raised by the game logic.
///
/// Every rejection names the rule that failed so the sync layer can report
/// it verbatim to the offending client. Variants marked fatal poison the
/// game instance instead of being reported and forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bid outside `0..=hand_size`.
    BidOutOfRange { bid: u8, hand_size: u8 },
    /// The final bidder tried to make the bids sum to the tricks available.
    BidHooked { forbidden: u8 },
    /// A bid, once set, is immutable for the round.
    BidAlreadyPlaced,
    MustFollowSuit,
    CardNotInHand,
    OutOfTurn,
    WrongPhase,
    GameFull,
    GameStarted,
    DuplicatePlayer,
    UnknownPlayer,
    NotHost,
    TooFewPlayers { seated: u8 },
    TooManyPlayers { seated: u8 },
    InvalidSchedule(String),
    ParseCard(String),
    /// The engine asked the deck for more cards than remain. Never reachable
    /// through a validated schedule; fatal if it happens.
    InsufficientCards { requested: usize, remaining: usize },
    /// The game was poisoned by an earlier invariant violation.
    GameAbandoned,
    /// Card-conservation or impossible-transition failure; fatal to the game.
    InvariantViolation(String),
}

impl DomainError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation(detail.into())
    }

    /// Fatal errors poison the game instance rather than being returned to
    /// the offending client alone.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::InvariantViolation(_) | DomainError::InsufficientCards { .. }
        )
    }

    /// Stable machine-readable code for the wire protocol.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::BidOutOfRange { .. } => "bid_out_of_range",
            DomainError::BidHooked { .. } => "bid_hooked",
            DomainError::BidAlreadyPlaced => "bid_already_placed",
            DomainError::MustFollowSuit => "must_follow_suit",
            DomainError::CardNotInHand => "card_not_in_hand",
            DomainError::OutOfTurn => "out_of_turn",
            DomainError::WrongPhase => "wrong_phase",
            DomainError::GameFull => "game_full",
            DomainError::GameStarted => "game_started",
            DomainError::DuplicatePlayer => "duplicate_player",
            DomainError::UnknownPlayer => "unknown_player",
            DomainError::NotHost => "not_host",
            DomainError::TooFewPlayers { .. } => "too_few_players",
            DomainError::TooManyPlayers { .. } => "too_many_players",
            DomainError::InvalidSchedule(_) => "invalid_schedule",
            DomainError::ParseCard(_) => "parse_card",
            DomainError::InsufficientCards { .. } => "insufficient_cards",
            DomainError::GameAbandoned => "game_abandoned",
            DomainError::InvariantViolation(_) => "invariant_violation",
        }
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::BidOutOfRange { bid, hand_size } => {
                write!(f, "bid {bid} outside 0..={hand_size}")
            }
            DomainError::BidHooked { forbidden } => {
                write!(f, "last bidder may not bid {forbidden}: bids would sum to the tricks available")
            }
            DomainError::BidAlreadyPlaced => write!(f, "bid already placed this round"),
            DomainError::MustFollowSuit => write!(f, "must follow suit"),
            DomainError::CardNotInHand => write!(f, "card not in hand"),
            DomainError::OutOfTurn => write!(f, "out of turn"),
            DomainError::WrongPhase => write!(f, "command not valid in current phase"),
            DomainError::GameFull => write!(f, "game is full"),
            DomainError::GameStarted => write!(f, "game already started"),
            DomainError::DuplicatePlayer => write!(f, "player id already connected"),
            DomainError::UnknownPlayer => write!(f, "unknown player id"),
            DomainError::NotHost => write!(f, "only the host may start the game"),
            DomainError::TooFewPlayers { seated } => {
                write!(f, "need at least 3 players, have {seated}")
            }
            DomainError::TooManyPlayers { seated } => {
                write!(f, "need at most 7 players, have {seated}")
            }
            DomainError::InvalidSchedule(detail) => write!(f, "invalid schedule: {detail}"),
            DomainError::ParseCard(token) => write!(f, "unparseable card token: {token:?}"),
            DomainError::InsufficientCards {
                requested,
                remaining,
            } => write!(f, "asked for {requested} cards, {remaining} remain"),
            DomainError::GameAbandoned => write!(f, "game abandoned after invariant violation"),
            DomainError::InvariantViolation(detail) => {
                write!(f, "invariant violated: {detail}")
            }
        }
    }
}

impl Error for DomainError {}
