use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{GroupId, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u32);

impl core::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary event paid by one member on behalf of the group.
///
/// Amount and payer are immutable once `locked` is set; the lock is applied
/// by the ledger close trigger when the group's debts are fully resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub payer: MemberId,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub locked: bool,
    pub lock_reason: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        group_id: GroupId,
        payer: MemberId,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            group_id,
            payer,
            amount,
            date,
            locked: false,
            lock_reason: None,
            locked_at: None,
        }
    }

    pub fn lock(&mut self, reason: String, at: DateTime<Utc>) {
        self.locked = true;
        self.lock_reason = Some(reason);
        self.locked_at = Some(at);
    }
}

/// One participant's share of a single expense. Splits are written
/// atomically with their parent expense and replaced wholesale on edit,
/// never patched individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split {
    pub expense_id: ExpenseId,
    pub participant: MemberId,
    pub amount: Decimal,
}
