//! Administrative backend for Balungpisah: account and field-agent
//! management, report history and orphan identity reconciliation.

pub mod core;
pub mod features;
pub mod shared;
