//! Per-person registry lookup.
//!
//! For every record a fresh tab searches the registry by name. Result cards
//! are opened in their own tab and the detail page is checked for the
//! expected birth date. Lookups run strictly one after another on a single
//! browser session, and the first browser failure aborts the batch.

use crate::document::{BrowserSession, DocumentView};
use crate::wait::WaitConfig;
use crate::{Error, Result};
use bankrot_core::matcher::{self, BIRTHDAY_FIELD};
use bankrot_core::{Collector, InputRecord, LookupOutcome};
use std::time::Duration;
use tokio::time::Instant;

/// Registry search page
pub const DEFAULT_SEARCH_URL: &str = "https://bankrot.fedresurs.ru/bankrupts";

/// Element selectors for the registry pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySelectors {
    pub search_input: String,
    pub results: String,
    pub card: String,
    pub card_link: String,
    pub info_item: String,
    /// Info item as it must exist in the DOM (and be visible) before reading
    pub info_ready: String,
    pub info_label: String,
    pub info_value: String,
}

impl Default for RegistrySelectors {
    fn default() -> Self {
        Self {
            search_input: "input[formcontrolname='searchString']".to_string(),
            results: "app-bankrupt-result-persons".to_string(),
            card: "app-bankrupt-result-persons app-bankrupt-result-card-person".to_string(),
            card_link: "a".to_string(),
            info_item: "div[class='info-item']".to_string(),
            info_ready: ".info-item".to_string(),
            info_label: ".info-item-name".to_string(),
            info_value: ".info-item-value".to_string(),
        }
    }
}

/// Which result cards are inspected for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardPolicy {
    /// Only the first card decides the verdict
    #[default]
    First,
    /// Try cards in order until one carries the expected birth date
    All,
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub search_url: String,
    pub selectors: RegistrySelectors,
    /// Detail label whose value must equal the record's birthday
    pub target_field: String,
    pub card_policy: CardPolicy,
    /// Bound for the search results to render. Running out is not an error.
    pub results_wait: WaitConfig,
    /// Extra delay once the results container is present
    pub settle: Duration,
    /// Bound for the card list inside the results container to fill and
    /// stop growing. Running out keeps the last count.
    pub cards_wait: WaitConfig,
    /// Bound for a card's detail tab to open and render
    pub detail_wait: WaitConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            selectors: RegistrySelectors::default(),
            target_field: BIRTHDAY_FIELD.to_string(),
            card_policy: CardPolicy::default(),
            results_wait: WaitConfig::new(Duration::from_secs(10)),
            settle: Duration::ZERO,
            cards_wait: WaitConfig::new(Duration::from_secs(2)),
            detail_wait: WaitConfig::new(Duration::from_secs(30)),
        }
    }
}

/// Runs registry lookups on a shared browser session
pub struct BankruptLookup<'a, S: BrowserSession> {
    session: &'a S,
    config: LookupConfig,
}

impl<'a, S: BrowserSession> BankruptLookup<'a, S> {
    pub fn new(session: &'a S, config: LookupConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Look up every record in order, adding one outcome per record.
    ///
    /// Stops at the first browser failure; outcomes collected before it stay
    /// in `collector`.
    pub async fn run(&self, records: &[InputRecord], collector: &mut Collector) -> Result<()> {
        tracing::info!("Start parsing {} records", records.len());

        for record in records {
            let outcome = self.check_user(record).await?;
            collector.add(outcome);
        }

        Ok(())
    }

    /// Search the registry for one person
    pub async fn check_user(&self, record: &InputRecord) -> Result<LookupOutcome> {
        tracing::info!("Check user {} {}", record.username, record.birthday);
        let selectors = &self.config.selectors;

        let view = self.session.open_view().await?;
        view.navigate(&self.config.search_url).await?;
        view.submit_search(&selectors.search_input, &record.username).await?;

        let cards_count = self.wait_for_cards(&view).await?;
        tracing::info!("{} user cards found", cards_count);

        let inspected = match self.config.card_policy {
            CardPolicy::First => cards_count.min(1),
            CardPolicy::All => cards_count,
        };

        for index in 0..inspected {
            if let Some(outcome) = self.check_card(&view, index, record).await? {
                return Ok(outcome);
            }
            tracing::debug!("Card {} did not match {}", index, record.username);
        }

        Ok(LookupOutcome::not_found(record))
    }

    /// Wait for search results and count the person cards
    async fn wait_for_cards(&self, view: &S::View) -> Result<usize> {
        let selectors = &self.config.selectors;

        let rendered = view
            .wait_for(&selectors.results, false, &self.config.results_wait)
            .await?;
        if !rendered {
            tracing::debug!(
                "No results rendered within {:?}",
                self.config.results_wait.timeout
            );
            return Ok(0);
        }

        if !self.config.settle.is_zero() {
            tokio::time::sleep(self.config.settle).await;
        }

        self.settled_card_count(view).await
    }

    /// Count person cards once the list stops changing.
    ///
    /// The results container renders before its cards, so a count is only
    /// accepted when it is non-zero and equal across two consecutive polls.
    async fn settled_card_count(&self, view: &S::View) -> Result<usize> {
        let wait = &self.config.cards_wait;
        let deadline = Instant::now() + wait.timeout;
        let mut previous = None;

        loop {
            let count = view.count(&self.config.selectors.card).await?;
            if count > 0 && previous == Some(count) {
                return Ok(count);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(count);
            }

            previous = Some(count);
            tokio::time::sleep(wait.poll_interval.min(deadline - now)).await;
        }
    }

    /// Open the `index`-th card and validate its detail page.
    ///
    /// Returns the found outcome, or `None` when the page does not carry the
    /// expected value.
    async fn check_card(
        &self,
        view: &S::View,
        index: usize,
        record: &InputRecord,
    ) -> Result<Option<LookupOutcome>> {
        let selectors = &self.config.selectors;
        let wait = &self.config.detail_wait;

        let detail = self
            .session
            .open_from_click(view, &selectors.card, index, &selectors.card_link, wait)
            .await?;

        if !detail.wait_for(&selectors.info_ready, true, wait).await? {
            return Err(wait.timeout_error(format!("{} on the detail page", selectors.info_ready)));
        }

        let items = detail
            .info_items(&selectors.info_item, &selectors.info_label, &selectors.info_value)
            .await?;

        tracing::info!("Check control data {}", record.birthday);
        if !matcher::field_matches(&items, &self.config.target_field, &record.birthday) {
            return Ok(None);
        }

        tracing::info!("Target found");
        let link = detail
            .url()
            .await?
            .ok_or_else(|| Error::Browser("Detail tab has no URL".to_string()))?;

        Ok(Some(LookupOutcome::found(record, link)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LookupConfig::default();

        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.target_field, "дата рождения");
        assert_eq!(config.card_policy, CardPolicy::First);
        assert_eq!(config.results_wait.timeout, Duration::from_secs(10));
        assert!(config.settle.is_zero());
        assert_eq!(config.cards_wait.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_card_selector_is_scoped_to_results() {
        let selectors = RegistrySelectors::default();
        assert!(selectors.card.starts_with(&selectors.results));
    }
}
