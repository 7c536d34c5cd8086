use rust_decimal::Decimal;

use crate::domain::{ExpenseId, MemberId, SettlementStatus};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("no participants selected for the split")]
    EmptySelection,

    #[error("split amounts sum to {actual}, expected {expected} (off by {delta})")]
    SplitMismatch {
        expected: Decimal,
        actual: Decimal,
        delta: Decimal,
    },

    #[error("member {actor} is not allowed to {action} this settlement")]
    ForbiddenTransition {
        actor: MemberId,
        action: &'static str,
    },

    #[error("cannot {action} a settlement in state {current}")]
    InvalidStateTransition {
        current: SettlementStatus,
        action: &'static str,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("expense {0} is locked by a closed ledger and cannot be modified")]
    ExpenseLocked(ExpenseId),
}
