//! Core business logic - framework-agnostic accounting operations.
//!
//! One module per area of the system. Every operation validates its
//! preconditions against the database, reports business-rule violations as
//! typed rejection reasons in its response struct, and performs its writes
//! inside a single database transaction.

/// Ledger accounts: creation, balances and transfer history
pub mod accounts;
/// Cooperation lifecycle: create, request, accept, deny, cancel, end
pub mod cooperation;
/// Coordination tenures and coordination transfer requests
pub mod coordination;
/// Private and productive consumption with compensation transfers
pub mod consumption;
/// Periodic sweep that detaches expired plans from their cooperations
pub mod expiry;
/// Registering and cancelling hours worked
pub mod hours;
/// Payout factor and public sector fund balance
pub mod payout;
/// Plan drafts, filing, review and hiding
pub mod plans;
/// Individual and cooperative prices
pub mod prices;
/// Member, company and accountant registration
pub mod registration;
/// Economy-wide statistics
pub mod statistics;
/// Work invitations and employment
pub mod workers;
