//! Ledger & settlement engine for group expense splitting.
//!
//! Turns a group's expenses, per-member splits, and peer-to-peer payment
//! records into net balances, reduces those into a suggested transfer
//! plan, and drives the settlement lifecycle up to the automatic ledger
//! close that locks fully settled history.
//!
//! The engine owns no I/O: callers hand it consistent snapshots through
//! the [`domain::LedgerStore`] seam and translate its typed errors into
//! their own transport.

pub mod balance;
pub mod domain;
pub mod engine;
pub mod memory_store;
pub mod planner;
pub mod split;

pub use balance::{Balances, compute_balances};
pub use domain::{
    Error, Expense, ExpenseId, Group, GroupId, GroupSnapshot, LedgerStore, MemberId, Settlement,
    SettlementId, SettlementStatus, Split,
};
pub use engine::{Engine, LedgerClose};
pub use memory_store::MemoryStore;
pub use planner::{Transfer, is_balanced, plan_transfers};
pub use split::{Allocation, SplitStrategy, allocate};
