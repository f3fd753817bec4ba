//! Track evaluator: the single place where a track's position is derived.
//!
//! Linear scan over Initial..=Reminder3:
//!   - unsent level           → that level is current, incomplete
//!   - sent, answered "yes"   → that level is current, complete
//!   - sent, answered "no"    → escalate to the next level
//!   - sent, no answer yet    → that level is current, awaiting response
//! Exhausting the ladder lands on Final, complete only once the terminal
//! flag is set.

use crate::{
    level::{Level, Response},
    track::Track,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalResult {
    pub current_level: Level,
    pub is_complete: bool,
    /// The current level was sent and no answer has arrived yet.
    pub awaiting_response: bool,
}

pub fn evaluate(track: &Track) -> EvalResult {
    for level in Level::RESPONSIVE {
        let record = track.record(level);
        match (record.sent, record.response) {
            (true, Some(Response::No)) => continue,
            (true, Some(Response::Yes)) => {
                return EvalResult {
                    current_level: level,
                    is_complete: true,
                    awaiting_response: false,
                };
            }
            _ => {
                return EvalResult {
                    current_level: level,
                    is_complete: false,
                    awaiting_response: record.is_awaiting_response(),
                };
            }
        }
    }

    EvalResult {
        current_level: Level::Final,
        is_complete: track.terminal_flag(),
        awaiting_response: false,
    }
}
