use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl core::fmt::Display for GroupId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::fmt::Display for MemberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared expense group ("Divvy"). Membership itself is owned elsewhere;
/// the engine only needs the roster and the ledger-close state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Roster in join order.
    pub members: Vec<MemberId>,
    /// Set by the ledger close trigger once every settlement is resolved.
    /// Expenses dated on or before this point are locked.
    pub close_watermark: Option<DateTime<Utc>>,
    pub archival_suggested: bool,
}

impl Group {
    pub fn new(id: GroupId, members: Vec<MemberId>) -> Self {
        Self {
            id,
            members,
            close_watermark: None,
            archival_suggested: false,
        }
    }
}
