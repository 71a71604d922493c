//! Reports, media and interventions as seen by operators.
//!
//! Reports are written by the citizen app; this service only reads them, for
//! account profiles and the resolution history.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/history` | Resolved reports with interventions |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
