//! Name directories: resolve foreign keys to display names.
//!
//! Pages that show a tenant or account id fetch the full list of that entity
//! once and resolve ids through a [`Directory`]. The lookup is read-through:
//! it is built by walking list pages until the server's total is reached and
//! answers with an explicit [`Resolution::NotFound`] rather than guessing.
//! Nothing is validated; a dangling id simply displays as itself.

#[cfg(test)]
#[path = "lookup_test.rs"]
mod lookup_test;

use std::collections::HashMap;
use std::future::Future;

use schema::{Account, Dataset, PageResponse, Tenant};

use crate::client::AdminApi;
use crate::error::ApiError;
use crate::session::SessionStore;
use crate::transport::Transport;

/// Upper bound on pages walked when building a directory.
pub const MAX_DIRECTORY_PAGES: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(&'a str),
    NotFound,
}

/// Id-to-name resolution with an explicit miss.
pub trait NameLookup {
    fn resolve(&self, id: &str) -> Resolution<'_>;

    /// The name for `id`, or `id` itself when unknown.
    fn display_name(&self, id: &str) -> String {
        match self.resolve(id) {
            Resolution::Found(name) => name.to_owned(),
            Resolution::NotFound => id.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    names: HashMap<String, String>,
}

impl Directory {
    #[must_use]
    pub fn from_tenants(tenants: &[Tenant]) -> Self {
        tenants.iter().map(|t| (t.id.clone(), t.name.clone())).collect()
    }

    /// Accounts are listed by name, falling back to email for unnamed ones.
    #[must_use]
    pub fn from_accounts(accounts: &[Account]) -> Self {
        accounts
            .iter()
            .map(|a| {
                let label = if a.name.trim().is_empty() { a.email.clone() } else { a.name.clone() };
                (a.id.clone(), label)
            })
            .collect()
    }

    #[must_use]
    pub fn from_datasets(datasets: &[Dataset]) -> Self {
        datasets.iter().map(|d| (d.id.clone(), d.name.clone())).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(id, name)` pairs sorted by name, for select inputs.
    #[must_use]
    pub fn options(&self) -> Vec<(String, String)> {
        let mut options: Vec<_> = self.names.iter().map(|(id, name)| (id.clone(), name.clone())).collect();
        options.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        options
    }
}

impl NameLookup for Directory {
    fn resolve(&self, id: &str) -> Resolution<'_> {
        self.names.get(id).map_or(Resolution::NotFound, |name| Resolution::Found(name))
    }
}

impl FromIterator<(String, String)> for Directory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { names: iter.into_iter().collect() }
    }
}

/// Walk list pages from 1 until the server's total is covered, an empty page
/// comes back, or [`MAX_DIRECTORY_PAGES`] is reached.
///
/// # Errors
///
/// The first failing page aborts the walk.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, ApiError>>,
{
    let mut rows = Vec::new();
    for page in 1..=MAX_DIRECTORY_PAGES {
        let response = fetch(page).await?;
        let last_page = response.pagination().last_page();
        let total = response.total;
        if response.data.is_empty() {
            break;
        }
        rows.extend(response.data);
        if page >= last_page || rows.len() as u64 >= total {
            break;
        }
    }
    Ok(rows)
}

impl<T: Transport, S: SessionStore> AdminApi<T, S> {
    /// Every tenant, keyed by id.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the underlying list calls.
    pub async fn tenant_directory(&self) -> Result<Directory, ApiError> {
        let tenants = collect_pages(|page| self.list_tenants(page)).await?;
        Ok(Directory::from_tenants(&tenants))
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the underlying list calls.
    pub async fn account_directory(&self) -> Result<Directory, ApiError> {
        let accounts = collect_pages(|page| self.list_accounts(page)).await?;
        Ok(Directory::from_accounts(&accounts))
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the underlying list calls.
    pub async fn dataset_directory(&self) -> Result<Directory, ApiError> {
        let datasets = collect_pages(|page| self.list_datasets(page)).await?;
        Ok(Directory::from_datasets(&datasets))
    }
}
