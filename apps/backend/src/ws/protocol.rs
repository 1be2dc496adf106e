use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::Seat;
use crate::domain::Card;
use crate::services::events::GameEvent;

pub const PROTOCOL_VERSION: i32 = 1;

/// Commands a client may send. Mutating commands after the join carry
/// `seq`, the player's monotonically increasing sequence number; replays
/// of an applied `seq` are acknowledged without re-applying.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    /// Join a game (created on first join) or re-attach after a disconnect.
    JoinGame {
        game_id: Uuid,
        player_id: Uuid,
        display_name: String,
    },
    StartGame {
        seq: u64,
    },
    PlaceBid {
        seq: u64,
        bid: u8,
    },
    PlayCard {
        seq: u64,
        card: Card,
    },
    LeaveGame {
        seq: u64,
    },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
    },

    /// Private reply to a successful join or rejoin.
    Joined {
        game_id: Uuid,
        player_id: Uuid,
        seat: Option<Seat>,
        version: u64,
        rejoined: bool,
    },

    /// The receiving player's redacted view of the game.
    Snapshot {
        snapshot: GameSnapshot,
    },

    /// A public event; every session of the game receives it.
    Event {
        event: GameEvent,
    },

    /// The sequenced command was applied (or recognized as a replay).
    CommandAccepted {
        seq: u64,
        version: u64,
        duplicate: bool,
    },

    /// The command was rejected; state is unchanged. `seq` is absent for
    /// join rejections. Sent to the offending session only.
    CommandRejected {
        #[serde(skip_serializing_if = "Option::is_none")]
        seq: Option<u64>,
        code: String,
        message: String,
    },

    /// Protocol-level failure (handshake, framing).
    Error {
        code: ErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadRequest,
    NotJoined,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_commands_parse_from_wire_json() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"hello","protocol":1}"#).unwrap();
        assert!(matches!(msg, ClientMsg::Hello { protocol: 1 }));

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"place_bid","seq":4,"bid":2}"#).unwrap();
        assert!(matches!(msg, ClientMsg::PlaceBid { seq: 4, bid: 2 }));

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"play_card","seq":9,"card":"QH"}"#).unwrap();
        let ClientMsg::PlayCard { seq: 9, card } = msg else {
            panic!("wrong variant");
        };
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"QH\"");
    }

    #[test]
    fn server_events_tag_both_layers() {
        let msg = ServerMsg::Event {
            event: GameEvent::TrickResolved {
                winner: 2,
                trick_no: 3,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"event""#));
        assert!(json.contains(r#""event":"trick_resolved""#));
    }
}
