//! Strategies for listing gists from the remote service.

use crate::github::{DocumentClient, DocumentClientExt};
use crate::models::Gist;
use crate::Result;

/// How a store lists its gists.
pub trait GistFetcher: Send + Sync {
    /// Store name used in logs and metrics.
    const NAME: &'static str;

    /// Whether a full fetch should record the daily-notes and prompts gists.
    const DISCOVERS_DISTINGUISHED: bool = false;

    /// Lists every gist the store covers.
    ///
    /// # Errors
    ///
    /// Returns an error if any remote request fails.
    fn fetch(&self, client: &dyn DocumentClient) -> Result<Vec<Gist>>;
}

/// The authenticated user's own gists, fetched page by page.
#[derive(Debug, Clone, Copy)]
pub struct OwnedGists {
    page_size: usize,
}

impl OwnedGists {
    /// Default page size (the API maximum).
    pub const DEFAULT_PAGE_SIZE: usize = 100;

    /// Creates a fetcher with the given page size.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Default for OwnedGists {
    fn default() -> Self {
        Self::with_page_size(Self::DEFAULT_PAGE_SIZE)
    }
}

impl GistFetcher for OwnedGists {
    const NAME: &'static str = "owned";
    const DISCOVERS_DISTINGUISHED: bool = true;

    fn fetch(&self, client: &dyn DocumentClient) -> Result<Vec<Gist>> {
        let mut gists = Vec::new();
        let mut page = 1_usize;

        loop {
            let params = [
                ("per_page", self.page_size.to_string()),
                ("page", page.to_string()),
            ];
            let batch: Vec<Gist> = client.get_json("", &params)?;
            let count = batch.len();
            tracing::debug!(page, count, "Fetched page of gists");
            gists.extend(batch);

            // A short page is the last one.
            if count < self.page_size {
                break;
            }
            page += 1;
        }

        Ok(gists)
    }
}

/// Gists the user has starred, fetched in a single request.
#[derive(Debug, Clone, Copy, Default)]
pub struct StarredGists;

impl StarredGists {
    /// Path of the starred listing.
    pub const PATH: &'static str = "/starred";
}

impl GistFetcher for StarredGists {
    const NAME: &'static str = "starred";

    fn fetch(&self, client: &dyn DocumentClient) -> Result<Vec<Gist>> {
        client.get_json(
            Self::PATH,
            &[("per_page", OwnedGists::DEFAULT_PAGE_SIZE.to_string())],
        )
    }
}
