//! The ledger engine: expense lifecycle, settlement state machine, and the
//! ledger close trigger, driven against a [`LedgerStore`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::balance::{self, Balances};
use crate::domain::{
    Error, Expense, ExpenseId, GroupId, GroupSnapshot, LedgerStore, MemberId, Settlement,
    SettlementId, SettlementStatus, Split,
};
use crate::planner::{self, Transfer};
use crate::split::{self, SplitStrategy};

/// Side effects of a ledger close: the watermark recorded on the group and
/// the expenses that were locked under it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerClose {
    pub watermark: DateTime<Utc>,
    pub locked_expenses: Vec<ExpenseId>,
}

#[derive(Debug)]
pub struct Engine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- expense lifecycle ----

    /// Allocate splits for a new expense and store both atomically.
    pub fn record_expense(
        &mut self,
        group: GroupId,
        payer: MemberId,
        amount: Decimal,
        date: NaiveDate,
        strategy: &SplitStrategy,
    ) -> Result<ExpenseId, Error> {
        self.ensure_group(group)?;
        let allocations = split::allocate(amount, strategy)?;

        let expense = Expense::new(ExpenseId(0), group, payer, amount, date);
        let splits = allocations
            .into_iter()
            .map(|a| Split {
                expense_id: ExpenseId(0),
                participant: a.participant,
                amount: a.amount,
            })
            .collect();
        let id = self.store.add_expense(expense, splits);
        debug!(group = %group, expense = %id, %amount, "expense recorded");
        Ok(id)
    }

    /// Re-allocate and replace an expense and its splits wholesale.
    /// Locked expenses are immutable.
    pub fn edit_expense(
        &mut self,
        id: ExpenseId,
        payer: MemberId,
        amount: Decimal,
        date: NaiveDate,
        strategy: &SplitStrategy,
    ) -> Result<(), Error> {
        let existing = self.store.expense(id).ok_or(Error::NotFound {
            entity: "expense",
            id: id.0,
        })?;
        if existing.locked {
            return Err(Error::ExpenseLocked(id));
        }
        let group = existing.group_id;

        let allocations = split::allocate(amount, strategy)?;
        let expense = Expense::new(id, group, payer, amount, date);
        let splits = allocations
            .into_iter()
            .map(|a| Split {
                expense_id: id,
                participant: a.participant,
                amount: a.amount,
            })
            .collect();
        self.store.replace_expense(expense, splits);
        debug!(group = %group, expense = %id, "expense replaced");
        Ok(())
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<(), Error> {
        let existing = self.store.expense(id).ok_or(Error::NotFound {
            entity: "expense",
            id: id.0,
        })?;
        if existing.locked {
            return Err(Error::ExpenseLocked(id));
        }
        self.store.remove_expense(id);
        Ok(())
    }

    // ---- derived views ----

    pub fn balances(&self, group: GroupId) -> Result<Balances, Error> {
        Ok(balance::compute_balances(&self.snapshot(group)?))
    }

    pub fn settlement_plan(&self, group: GroupId) -> Result<Vec<Transfer>, Error> {
        Ok(planner::plan_transfers(&self.balances(group)?))
    }

    pub fn is_balanced(&self, group: GroupId) -> Result<bool, Error> {
        Ok(planner::is_balanced(&self.snapshot(group)?))
    }

    // ---- settlement state machine ----

    /// Register a debtor's intent to pay a creditor.
    ///
    /// Only the debtor may create a settlement naming themselves as `from`.
    /// If an active settlement already exists for this (group, from, to)
    /// pair, its id is returned instead of inserting a duplicate.
    pub fn create_settlement(
        &mut self,
        group: GroupId,
        actor: MemberId,
        from: MemberId,
        to: MemberId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<SettlementId, Error> {
        self.ensure_group(group)?;
        if actor != from {
            return Err(Error::ForbiddenTransition {
                actor,
                action: "create",
            });
        }
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount));
        }

        if let Some(existing) = self.store.find_active_settlement(group, from, to) {
            debug!(settlement = %existing.id, "active settlement already exists, reusing");
            return Ok(existing.id);
        }

        let id = self
            .store
            .add_settlement(Settlement::new(SettlementId(0), group, from, to, amount, now));
        debug!(group = %group, settlement = %id, %from, %to, %amount, "settlement created");
        Ok(id)
    }

    /// Debtor asserts the payment was made: `pending -> paymentsent`.
    pub fn mark_payment_sent(
        &mut self,
        id: SettlementId,
        actor: MemberId,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let settlement = self.settlement_ref(id)?;
        if actor != settlement.from {
            return Err(Error::ForbiddenTransition {
                actor,
                action: "mark sent",
            });
        }
        if settlement.status != SettlementStatus::Pending {
            return Err(Error::InvalidStateTransition {
                current: settlement.status,
                action: "mark sent",
            });
        }
        let settlement = self.settlement_mut(id)?;
        settlement.status = SettlementStatus::PaymentSent;
        settlement.paid_at = Some(now);
        debug!(settlement = %id, "payment marked sent");
        Ok(())
    }

    /// Creditor verifies receipt: `paymentsent -> confirmed` (terminal).
    /// On success the ledger close trigger runs for the group.
    pub fn confirm_settlement(
        &mut self,
        id: SettlementId,
        actor: MemberId,
        now: DateTime<Utc>,
    ) -> Result<Option<LedgerClose>, Error> {
        let group = self.resolve(id, actor, "confirm", SettlementStatus::Confirmed, now)?;
        self.try_close_ledger(group, now)
    }

    /// Creditor disputes the claim: `paymentsent -> rejected` (terminal).
    /// On success the ledger close trigger runs for the group.
    pub fn reject_settlement(
        &mut self,
        id: SettlementId,
        actor: MemberId,
        now: DateTime<Utc>,
    ) -> Result<Option<LedgerClose>, Error> {
        let group = self.resolve(id, actor, "reject", SettlementStatus::Rejected, now)?;
        self.try_close_ledger(group, now)
    }

    /// Shared guard path for the two creditor-side terminal transitions.
    fn resolve(
        &mut self,
        id: SettlementId,
        actor: MemberId,
        action: &'static str,
        target: SettlementStatus,
        now: DateTime<Utc>,
    ) -> Result<GroupId, Error> {
        let settlement = self.settlement_ref(id)?;
        if actor != settlement.to {
            return Err(Error::ForbiddenTransition { actor, action });
        }
        if settlement.status != SettlementStatus::PaymentSent {
            return Err(Error::InvalidStateTransition {
                current: settlement.status,
                action,
            });
        }
        let group = settlement.group_id;
        let settlement = self.settlement_mut(id)?;
        settlement.status = target;
        if target == SettlementStatus::Confirmed {
            settlement.confirmed_at = Some(now);
        }
        info!(settlement = %id, status = %target, "settlement resolved");
        Ok(group)
    }

    // ---- ledger close trigger ----

    /// If the group is square (every settlement terminal and no
    /// outstanding debts), close the book: record the watermark (latest
    /// confirmation time) on the group and lock every expense dated on or
    /// before it.
    ///
    /// All-rejected groups have no confirmed period to close, so nothing
    /// happens for them.
    fn try_close_ledger(
        &mut self,
        group: GroupId,
        now: DateTime<Utc>,
    ) -> Result<Option<LedgerClose>, Error> {
        let snapshot = self.snapshot(group)?;
        let Some(watermark) = close_watermark(&snapshot) else {
            return Ok(None);
        };

        self.store.close_group(group, watermark);
        let mut locked_expenses = Vec::new();
        for expense in &snapshot.expenses {
            if expense.locked || expense.date > watermark.date_naive() {
                continue;
            }
            if let Some(stored) = self.store.expense_mut(expense.id) {
                stored.lock(format!("ledger closed at {watermark}"), now);
                locked_expenses.push(expense.id);
            }
        }
        info!(
            group = %group,
            %watermark,
            locked = locked_expenses.len(),
            "ledger closed"
        );
        Ok(Some(LedgerClose {
            watermark,
            locked_expenses,
        }))
    }

    fn snapshot(&self, group: GroupId) -> Result<GroupSnapshot, Error> {
        self.store.snapshot(group).ok_or(Error::NotFound {
            entity: "group",
            id: group.0,
        })
    }

    fn ensure_group(&self, group: GroupId) -> Result<(), Error> {
        if self.store.contains_group(group) {
            Ok(())
        } else {
            Err(Error::NotFound {
                entity: "group",
                id: group.0,
            })
        }
    }

    fn settlement_ref(&self, id: SettlementId) -> Result<&Settlement, Error> {
        self.store.settlement(id).ok_or(Error::NotFound {
            entity: "settlement",
            id: id.0,
        })
    }

    fn settlement_mut(&mut self, id: SettlementId) -> Result<&mut Settlement, Error> {
        self.store.settlement_mut(id).ok_or(Error::NotFound {
            entity: "settlement",
            id: id.0,
        })
    }
}

/// The close watermark, if the group's book can be closed: at least one
/// settlement exists, the group is balanced (every settlement terminal and
/// an empty transfer plan, so one confirmed debt cannot close the book
/// while another member still owes), and at least one settlement was
/// confirmed.
fn close_watermark(snapshot: &GroupSnapshot) -> Option<DateTime<Utc>> {
    if snapshot.settlements.is_empty() {
        return None;
    }
    if !planner::is_balanced(snapshot) {
        return None;
    }
    snapshot
        .settlements
        .iter()
        .filter_map(|s| s.confirmed_at)
        .max()
}
