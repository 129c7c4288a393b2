//! Request and response messages.
//!
//! Every message is plain JSON data. A request names a `command`; the
//! response echoes the original request as `context` and carries either a
//! `response` payload or an `error` string.
//!
//! ```text
//! {"command":"nextMove","state":{...},"time":500}
//! {"context":{"command":"nextMove",...},"response":[{"action":"place","node":4}]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{GameState, Move, Variant};
use crate::execute::InvalidMove;

/// A request to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    /// Search `state` for `time` milliseconds and return the best moves.
    NextMove { state: GameState, time: u64 },

    /// List the legal moves in `state`.
    ValidMoves { state: GameState },

    /// Apply a move to `state` and return the resulting state.
    ExecuteMove {
        state: GameState,
        #[serde(rename = "move")]
        mv: Move,
    },

    /// Return the opening position of a variant.
    NewGame {
        #[serde(default)]
        variant: Variant,
    },
}

/// The result carried by a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Moves(Vec<Move>),
    State(GameState),
}

/// A response to one request line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The request exactly as received.
    pub context: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(context: Value, payload: Payload) -> Self {
        Response { context, response: Some(payload), error: None }
    }

    pub fn error(context: Value, message: impl Into<String>) -> Self {
        Response { context, response: None, error: Some(message.into()) }
    }
}

/// Errors raised while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid move: {0}")]
    Move(#[from] InvalidMove),
}

/// Parses one request line.
///
/// Returns the raw JSON value alongside the outcome so a response can echo
/// the request even when it does not decode. A line that is not JSON at all
/// is echoed as a string.
pub fn parse_request(line: &str) -> (Value, Result<Request, ProtocolError>) {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return (Value::String(line.to_string()), Err(e.into())),
    };
    let request = Request::deserialize(&value).map_err(ProtocolError::from);
    (value, request)
}
