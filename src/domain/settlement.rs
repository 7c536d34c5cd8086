use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{GroupId, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementId(pub u32);

impl core::fmt::Display for SettlementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a peer-to-peer payment claim.
///
/// `Pending` and `PaymentSent` are the active states; `Confirmed` and
/// `Rejected` are terminal and immutable. Only a confirmed settlement
/// moves balances — a sent claim is not yet trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    PaymentSent,
    Confirmed,
    Rejected,
}

impl SettlementStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::PaymentSent)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl core::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::PaymentSent => "paymentsent",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A claim that `from` paid `to` outside the system, reducing their debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub group_id: GroupId,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
    pub status: SettlementStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Settlement {
    pub fn new(
        id: SettlementId,
        group_id: GroupId,
        from: MemberId,
        to: MemberId,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            from,
            to,
            amount,
            status: SettlementStatus::Pending,
            created_at,
            paid_at: None,
            confirmed_at: None,
        }
    }
}

impl core::fmt::Display for Settlement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "settlement {} (group={}, {} -> {}, amount={}, {})",
            self.id, self.group_id, self.from, self.to, self.amount, self.status
        )
    }
}
