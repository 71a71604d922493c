mod account;

pub use account::{Account, AccountRole};
