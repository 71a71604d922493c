pub mod accounts;
pub mod auth;
pub mod logto;
pub mod orphans;
pub mod reports;
