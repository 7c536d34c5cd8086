use chrono::{DateTime, Utc};

use crate::domain::{
    Expense, ExpenseId, Group, MemberId, Settlement, SettlementId, Split, GroupId,
};

/// A consistent read of everything the engine needs about one group.
///
/// The pure calculators (balances, transfer plan, ledger close check) only
/// ever see one of these, so a caller that assembles it inside a single
/// transaction never exposes them to a half-written state. Collections are
/// ordered by id so downstream output is reproducible.
#[derive(Debug, Clone)]
pub struct GroupSnapshot {
    pub group: Group,
    pub expenses: Vec<Expense>,
    pub splits: Vec<Split>,
    pub settlements: Vec<Settlement>,
}

/// Storage seam between the engine and whatever persistence the embedder
/// brings. Writes that the data model calls atomic (expense + splits,
/// wholesale split replacement) are single trait calls so an implementation
/// can wrap them in one transaction.
pub trait LedgerStore {
    fn contains_group(&self, group: GroupId) -> bool;

    fn snapshot(&self, group: GroupId) -> Option<GroupSnapshot>;

    fn settlement(&self, id: SettlementId) -> Option<&Settlement>;

    fn settlement_mut(&mut self, id: SettlementId) -> Option<&mut Settlement>;

    /// The unique active (pending or payment-sent) settlement for a
    /// debtor/creditor pair, if one exists.
    fn find_active_settlement(
        &self,
        group: GroupId,
        from: MemberId,
        to: MemberId,
    ) -> Option<&Settlement>;

    /// Assigns an id to the settlement and stores it.
    fn add_settlement(&mut self, settlement: Settlement) -> SettlementId;

    fn expense(&self, id: ExpenseId) -> Option<&Expense>;

    fn expense_mut(&mut self, id: ExpenseId) -> Option<&mut Expense>;

    /// Assigns an id and stores the expense together with its splits.
    fn add_expense(&mut self, expense: Expense, splits: Vec<Split>) -> ExpenseId;

    /// Overwrites the expense keyed by `expense.id` and replaces its splits
    /// wholesale.
    fn replace_expense(&mut self, expense: Expense, splits: Vec<Split>);

    fn remove_expense(&mut self, id: ExpenseId);

    /// Records the close watermark and flags the group for archival.
    fn close_group(&mut self, group: GroupId, watermark: DateTime<Utc>);
}
