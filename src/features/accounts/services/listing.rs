//! In-memory narrowing of a fetched account list.
//!
//! The list fetcher returns every account of a role; the text filter and
//! the paginator then work on that collection without going back to the
//! database.

use crate::features::accounts::models::Account;
use crate::shared::pagination::Paginator;

/// Case-insensitive substring match over name, surname, email and phone
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    needle: Option<String>,
}

impl AccountFilter {
    /// Blank or whitespace-only search matches everything
    pub fn new(search: Option<&str>) -> Self {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn matches(&self, account: &Account) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };

        [
            Some(account.name.as_str()),
            account.surname.as_deref(),
            Some(account.email.as_str()),
            account.phone.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }

    pub fn apply(&self, accounts: Vec<Account>) -> Vec<Account> {
        accounts.into_iter().filter(|a| self.matches(a)).collect()
    }
}

/// One page of filtered accounts plus the paginator that produced it
#[derive(Debug)]
pub struct AccountPage {
    pub items: Vec<Account>,
    pub paginator: Paginator,
}

/// Filter, then slice out `page` (clamped to the available pages)
pub fn filter_and_paginate(
    accounts: Vec<Account>,
    search: Option<&str>,
    page: i64,
    page_size: i64,
) -> AccountPage {
    let filtered = AccountFilter::new(search).apply(accounts);

    let mut paginator = Paginator::new(filtered.len() as i64, page_size);
    paginator.go_to_page(page);
    let items = paginator.slice(&filtered).to_vec();

    AccountPage { items, paginator }
}
