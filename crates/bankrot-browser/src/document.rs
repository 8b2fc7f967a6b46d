//! Browser capability used by the lookup procedure.
//!
//! The lookup only needs a handful of document operations, so it is written
//! against these traits instead of a concrete CDP client. [`crate::chromium`]
//! provides the real implementation; tests plug in an in-memory registry.

use crate::wait::WaitConfig;
use crate::Result;
use async_trait::async_trait;
use bankrot_core::InfoItem;

/// A single browser tab
#[async_trait]
pub trait DocumentView: Send + Sync {
    /// Navigate to `url` and wait until the document has loaded
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Fill the form control matching `selector` with `query` and press Enter
    async fn submit_search(&self, selector: &str, query: &str) -> Result<()>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Wait until an element matching `selector` exists (and is visible when
    /// `visible` is set). Returns `false` when the wait timed out.
    async fn wait_for(&self, selector: &str, visible: bool, wait: &WaitConfig) -> Result<bool>;

    /// Read the label and value text of every element matching `item`
    async fn info_items(&self, item: &str, label: &str, value: &str) -> Result<Vec<InfoItem>>;

    /// Current URL of the tab
    async fn url(&self) -> Result<Option<String>>;
}

/// A browser session shared by all lookups
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type View: DocumentView;

    /// Open a new blank tab
    async fn open_view(&self) -> Result<Self::View>;

    /// Click the `anchor` inside the `index`-th element matching `container`
    /// on `view` and return the tab the click opened.
    async fn open_from_click(
        &self,
        view: &Self::View,
        container: &str,
        index: usize,
        anchor: &str,
        wait: &WaitConfig,
    ) -> Result<Self::View>;
}
