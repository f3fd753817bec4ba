//! The FTDH case record: static dispute attributes plus the two tracks.
//!
//! The case is the sole owner of its tracks. Track records are private;
//! the engine swaps in the values returned by the track mutators and
//! nothing else writes them.

use crate::{
    error::{CaseError, CaseResult},
    track::{Track, TrackKind},
    types::{Amount, CaseId, Timestamp},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dispute facts collected at creation. Opaque to the escalation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeAttributes {
    pub ftdh_number: String,
    pub sending_bank: String,
    pub receiving_bank: String,
    pub sender_account: String,
    pub beneficiary_account: String,
    pub stan: u32,
    pub transaction_date: NaiveDate,
    pub transaction_amount: Amount,
    pub action_taken: String,
    pub recovery_amount: Option<Amount>,
    pub amount_on_hold: Option<Amount>,
    pub branch_name: String,
    pub branch_email: String,
    pub member_bank_contact: String,
    pub member_bank_email: String,
    pub member_bank_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,
    pub created_at: Timestamp,
    pub attributes: DisputeAttributes,
    branch: Track,
    member_bank: Track,
}

impl Case {
    /// A new case with both tracks at Initial and nothing sent.
    pub fn new(id: CaseId, attributes: DisputeAttributes, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            attributes,
            branch: Track::new(TrackKind::Branch),
            member_bank: Track::new(TrackKind::MemberBank),
        }
    }

    pub fn track(&self, kind: TrackKind) -> &Track {
        match kind {
            TrackKind::Branch     => &self.branch,
            TrackKind::MemberBank => &self.member_bank,
        }
    }

    pub fn branch(&self) -> &Track {
        &self.branch
    }

    pub fn member_bank(&self) -> &Track {
        &self.member_bank
    }

    /// Copy of this case with one track replaced.
    pub(crate) fn with_track(&self, track: Track) -> Self {
        let mut next = self.clone();
        match track.kind {
            TrackKind::Branch     => next.branch = track,
            TrackKind::MemberBank => next.member_bank = track,
        }
        next
    }

    /// Rehydrate a stored case, rejecting states no sequence of
    /// operations could have produced.
    pub fn from_json(json: &str) -> CaseResult<Self> {
        let case: Case = serde_json::from_str(json)?;
        case.check_invariants()?;
        Ok(case)
    }

    pub fn to_json(&self) -> CaseResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn check_invariants(&self) -> CaseResult<()> {
        for kind in [TrackKind::Branch, TrackKind::MemberBank] {
            let track = self.track(kind);
            if track.kind != kind {
                return Err(CaseError::InvalidInput(format!(
                    "case {}: {kind} slot holds a {} track",
                    self.id, track.kind
                )));
            }
            track.check_invariants()?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{level::Level, track::mark_sent};
    use chrono::{TimeZone, Utc};

    fn case() -> Case {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        Case::new(uuid::Uuid::new_v4(), fixtures::attributes(), created)
    }

    #[test]
    fn json_rehydrates_without_loss() {
        let original = case();
        let sent_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let branch = mark_sent(original.branch(), Level::Initial, sent_at).unwrap();
        let original = original.with_track(branch);

        let json = original.to_json().unwrap();
        assert!(json.contains("2024-05-01T09:00:00Z"));
        let back = Case::from_json(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn stored_keys_are_camel_case() {
        let value = serde_json::to_value(case()).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value["memberBank"]["levels"][0].get("sentAt").is_some());
        assert!(value["attributes"].get("transactionAmount").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn swapped_tracks_are_rejected() {
        let original = case();
        let mut value = serde_json::to_value(&original).unwrap();
        value["branch"]["kind"] = "member_bank".into();
        let err = Case::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, CaseError::InvalidInput(_)));
    }

    #[test]
    fn malformed_response_value_is_rejected() {
        let mut value = serde_json::to_value(case()).unwrap();
        value["branch"]["levels"][0]["response"] = "maybe".into();
        let err = Case::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, CaseError::Serialization(_)));
    }
}
