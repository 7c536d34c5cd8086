//! HashMap-backed [`LedgerStore`] for tests and embedders without their
//! own persistence.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Expense, ExpenseId, Group, GroupId, GroupSnapshot, LedgerStore, MemberId, Settlement,
    SettlementId, Split,
};

#[derive(Default, Debug)]
pub struct MemoryStore {
    groups: HashMap<GroupId, Group>,
    expenses: HashMap<ExpenseId, Expense>,
    splits: HashMap<ExpenseId, Vec<Split>>,
    settlements: HashMap<SettlementId, Settlement>,
    next_group_id: u32,
    next_expense_id: u32,
    next_settlement_id: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_group(&mut self, members: Vec<MemberId>) -> GroupId {
        self.next_group_id += 1;
        let id = GroupId(self.next_group_id);
        self.groups.insert(id, Group::new(id, members));
        id
    }
}

impl LedgerStore for MemoryStore {
    fn contains_group(&self, group: GroupId) -> bool {
        self.groups.contains_key(&group)
    }

    fn snapshot(&self, group: GroupId) -> Option<GroupSnapshot> {
        let group = self.groups.get(&group)?.clone();

        let mut expenses: Vec<Expense> = self
            .expenses
            .values()
            .filter(|e| e.group_id == group.id)
            .cloned()
            .collect();
        expenses.sort_by_key(|e| e.id);

        let splits = expenses
            .iter()
            .flat_map(|e| self.splits.get(&e.id).into_iter().flatten())
            .cloned()
            .collect();

        let mut settlements: Vec<Settlement> = self
            .settlements
            .values()
            .filter(|s| s.group_id == group.id)
            .cloned()
            .collect();
        settlements.sort_by_key(|s| s.id);

        Some(GroupSnapshot {
            group,
            expenses,
            splits,
            settlements,
        })
    }

    fn settlement(&self, id: SettlementId) -> Option<&Settlement> {
        self.settlements.get(&id)
    }

    fn settlement_mut(&mut self, id: SettlementId) -> Option<&mut Settlement> {
        self.settlements.get_mut(&id)
    }

    fn find_active_settlement(
        &self,
        group: GroupId,
        from: MemberId,
        to: MemberId,
    ) -> Option<&Settlement> {
        self.settlements.values().find(|s| {
            s.group_id == group && s.from == from && s.to == to && s.status.is_active()
        })
    }

    fn add_settlement(&mut self, mut settlement: Settlement) -> SettlementId {
        self.next_settlement_id += 1;
        let id = SettlementId(self.next_settlement_id);
        settlement.id = id;
        self.settlements.insert(id, settlement);
        id
    }

    fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(&id)
    }

    fn expense_mut(&mut self, id: ExpenseId) -> Option<&mut Expense> {
        self.expenses.get_mut(&id)
    }

    fn add_expense(&mut self, mut expense: Expense, mut splits: Vec<Split>) -> ExpenseId {
        self.next_expense_id += 1;
        let id = ExpenseId(self.next_expense_id);
        expense.id = id;
        for split in &mut splits {
            split.expense_id = id;
        }
        self.expenses.insert(id, expense);
        self.splits.insert(id, splits);
        id
    }

    fn replace_expense(&mut self, expense: Expense, splits: Vec<Split>) {
        let id = expense.id;
        self.expenses.insert(id, expense);
        self.splits.insert(id, splits);
    }

    fn remove_expense(&mut self, id: ExpenseId) {
        self.expenses.remove(&id);
        self.splits.remove(&id);
    }

    fn close_group(&mut self, group: GroupId, watermark: DateTime<Utc>) {
        if let Some(group) = self.groups.get_mut(&group) {
            group.close_watermark = Some(watermark);
            group.archival_suggested = true;
        }
    }
}
