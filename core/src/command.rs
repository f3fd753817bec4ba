use crate::{
    level::{Level, Response},
    track::TrackKind,
};
use serde::{Deserialize, Serialize};

/// Every user action that can change a case's tracks.
/// Variants map one-to-one onto the track mutators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum CaseCommand {
    MarkSent {
        track: TrackKind,
        level: Level,
    },
    RecordResponse {
        track:    TrackKind,
        level:    Level,
        response: Response,
    },
}

impl CaseCommand {
    pub fn track(&self) -> TrackKind {
        match self {
            Self::MarkSent { track, .. } | Self::RecordResponse { track, .. } => *track,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MarkSent { .. }       => "mark_sent",
            Self::RecordResponse { .. } => "record_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_tagged_json() {
        let cmd: CaseCommand = serde_json::from_str(
            r#"{ "cmd": "record_response", "track": "member_bank", "level": "reminder2", "response": "no" }"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            CaseCommand::RecordResponse {
                track:    TrackKind::MemberBank,
                level:    Level::Reminder2,
                response: Response::No,
            }
        );
        assert_eq!(cmd.track(), TrackKind::MemberBank);
    }
}
