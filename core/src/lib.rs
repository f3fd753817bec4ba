//! FTDH escalation engine.
//!
//! Tracks a fraud-dispute case through two escalation ladders (branch and
//! member bank) and derives, from what has been sent and answered, where
//! each ladder stands. Every screen asks `engine::CaseEngine`; nothing
//! else re-derives track state.

pub mod case;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod level;
pub mod projection;
pub mod status;
pub mod track;
pub mod types;
pub mod wizard;

pub use case::{Case, DisputeAttributes};
pub use engine::{CaseEngine, CaseView};
pub use error::{CaseError, CaseResult};
pub use evaluator::{evaluate, EvalResult};
pub use level::{Level, LevelRecord, Response};
pub use status::{status_of, Severity, StatusTag};
pub use track::{Track, TrackKind};
