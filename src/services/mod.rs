//! Services Layer
//!
//! Business logic extracted from HTTP handlers: the loan state machine and the
//! inventory ledger it drives.

pub mod inventory;
pub mod loan_service;
pub mod overdue_sweeper;

pub use inventory::LedgerDiscrepancy;
pub use loan_service::ReturnReceipt;
pub use overdue_sweeper::run_sweeper;
