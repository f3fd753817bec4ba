//! Shared primitive types used across the entire engine.

use chrono::{DateTime, Utc};

/// Wall-clock instant. Serialized as an RFC 3339 string.
pub type Timestamp = DateTime<Utc>;

/// A stable, unique identifier for a case.
pub type CaseId = uuid::Uuid;

/// Monetary amount in the case currency.
pub type Amount = f64;
