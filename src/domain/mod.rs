pub mod error;
pub mod expense;
pub mod group;
pub mod money;
pub mod settlement;
pub mod traits;

pub use error::Error;
pub use expense::{Expense, ExpenseId, Split};
pub use group::{Group, GroupId, MemberId};
pub use settlement::{Settlement, SettlementId, SettlementStatus};
pub use traits::{GroupSnapshot, LedgerStore};
