//! Account and field-agent administration.
//!
//! Listing fetches every account of a role (newest first) and narrows the
//! collection in memory: a case-insensitive text filter, then a fixed-size
//! paginator whose page is clamped into range.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/accounts` | List accounts (role, search, page) |
//! | GET | `/api/admin/accounts/{id}` | Profile with reports and interventions |
//! | PATCH | `/api/admin/accounts/{id}` | Update profile fields |
//! | PATCH | `/api/admin/accounts/{id}/active` | Toggle active status |
//! | DELETE | `/api/admin/accounts/{id}?confirm=true` | Delete account and identity |
//! | PUT | `/api/admin/accounts/{id}/password` | Set a new password |
//! | PUT | `/api/admin/accounts/{id}/authority` | Change operator level (national) |
//! | POST | `/api/admin/agents` | Create a field agent |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AccountService;
