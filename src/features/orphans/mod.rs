//! Orphan identity reconciliation.
//!
//! An orphan is a Logto user whose id appears in no `accounts.auth_user_id`
//! and is not in `ORPHAN_IGNORED_USER_IDS`. The only thing to do with one is
//! delete it.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/orphans` | List orphan identities |
//! | DELETE | `/api/admin/orphans/{auth_user_id}?confirm=true` | Delete one orphan |
//! | DELETE | `/api/admin/orphans?confirm=true` | Delete all orphans (national) |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::OrphanService;
