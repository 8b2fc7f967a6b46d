use crate::document::{BrowserSession, DocumentView};
use crate::launcher::LaunchOptions;
use crate::wait::{poll_until, WaitConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use bankrot_core::InfoItem;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::target::{EventTargetCreated, TargetId, TargetInfo};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const TEXT_CONTENT_JS: &str = "function() { return this.textContent; }";

/// Key events only cover the US layout, so the query is written into the
/// control directly and announced to the page's form bindings.
fn fill_value_js(query: &str) -> String {
    let literal = serde_json::Value::String(query.to_owned()).to_string();
    format!(
        "function() {{
    this.focus();
    this.value = {literal};
    this.dispatchEvent(new Event('input', {{ bubbles: true }}));
    this.dispatchEvent(new Event('change', {{ bubbles: true }}));
}}"
    )
}

const IS_VISIBLE_JS: &str = "function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.visibility !== 'hidden' && style.display !== 'none'
        && rect.width > 0 && rect.height > 0;
}";

/// Chromium driven over the DevTools protocol
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launch Chromium and start pumping CDP messages
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        tracing::info!("Browser initialization...");
        tracing::debug!(
            "Launching Chromium (headless: {}) with profile {}",
            options.headless,
            options.profile_path.display()
        );

        let config = options.browser_config()?;
        let (browser, mut handler) = Browser::launch(config).await?;

        // Every browser command depends on this task draining the connection
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Close the browser and stop the handler task
    pub async fn close(mut self) -> Result<()> {
        tracing::info!("Browser close");

        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for Chromium to exit failed: {}", e);
        }
        self.handler_task.abort();

        Ok(())
    }

    /// Wait for the first page target opened by `opener` and return its id
    async fn next_page_target(
        created: &mut (impl futures::Stream<Item = std::sync::Arc<EventTargetCreated>> + Unpin),
        opener: &TargetId,
        wait: &WaitConfig,
    ) -> Result<TargetId> {
        let next = async {
            while let Some(event) = created.next().await {
                let info = &event.target_info;
                if opened_by(info, opener) {
                    return Some(info.target_id.clone());
                }
            }
            None
        };

        tokio::time::timeout(wait.timeout, next)
            .await
            .map_err(|_| wait.timeout_error("a new tab to open"))?
            .ok_or_else(|| Error::Browser("Target event stream closed".to_string()))
    }

    /// Resolve a target id to an attached page
    async fn attached_page(&self, target_id: &TargetId, wait: &WaitConfig) -> Result<Page> {
        let deadline = Instant::now() + wait.timeout;

        loop {
            let pages = self.browser.pages().await?;
            if let Some(page) = pages.into_iter().find(|p| p.target_id() == target_id) {
                return Ok(page);
            }

            if Instant::now() >= deadline {
                return Err(wait.timeout_error("the new tab to attach"));
            }
            tokio::time::sleep(wait.poll_interval).await;
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type View = ChromiumView;

    async fn open_view(&self) -> Result<ChromiumView> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromiumView { page })
    }

    async fn open_from_click(
        &self,
        view: &ChromiumView,
        container: &str,
        index: usize,
        anchor: &str,
        wait: &WaitConfig,
    ) -> Result<ChromiumView> {
        // Subscribe before clicking so the creation event cannot be missed
        let mut created = self.browser.event_listener::<EventTargetCreated>().await?;

        let containers = view.page.find_elements(container).await?;
        let target = containers
            .get(index)
            .ok_or_else(|| Error::ElementNotFound(format!("{} #{}", container, index)))?;
        let link = find_in(target, anchor).await?;
        link.click().await?;

        let target_id = Self::next_page_target(&mut created, view.page.target_id(), wait).await?;
        tracing::debug!("New tab opened: {:?}", target_id);

        let page = self.attached_page(&target_id, wait).await?;
        Ok(ChromiumView { page })
    }
}

/// A Chromium tab
pub struct ChromiumView {
    page: Page,
}

impl ChromiumView {
    async fn find(&self, selector: &str) -> Result<Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| Error::ElementNotFound(format!("{}: {}", selector, e)))
    }

    async fn is_present(&self, selector: &str, visible: bool) -> Result<bool> {
        let Some(first) = self.page.find_elements(selector).await?.into_iter().next() else {
            return Ok(false);
        };

        if !visible {
            return Ok(true);
        }

        let ret = first.call_js_fn(IS_VISIBLE_JS, false).await?;
        Ok(ret.result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[async_trait]
impl DocumentView for ChromiumView {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn submit_search(&self, selector: &str, query: &str) -> Result<()> {
        let input = self.find(selector).await?;
        input.call_js_fn(fill_value_js(query), false).await?;
        input.press_key("Enter").await?;
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.find_elements(selector).await?.len())
    }

    async fn wait_for(&self, selector: &str, visible: bool, wait: &WaitConfig) -> Result<bool> {
        tracing::debug!("Waiting up to {:?} for {}", wait.timeout, selector);
        poll_until(wait, || self.is_present(selector, visible)).await
    }

    async fn info_items(&self, item: &str, label: &str, value: &str) -> Result<Vec<InfoItem>> {
        let elements = self.page.find_elements(item).await?;
        let mut items = Vec::with_capacity(elements.len());

        for element in &elements {
            items.push(InfoItem {
                label: child_text(element, label).await?,
                value: child_text(element, value).await?,
            });
        }

        Ok(items)
    }

    async fn url(&self) -> Result<Option<String>> {
        Ok(self.page.url().await?)
    }
}

async fn find_in(element: &Element, selector: &str) -> Result<Element> {
    element
        .find_element(selector)
        .await
        .map_err(|e| Error::ElementNotFound(format!("{}: {}", selector, e)))
}

/// `textContent` of the first descendant matching `selector`, if there is one
async fn child_text(element: &Element, selector: &str) -> Result<Option<String>> {
    let Some(child) = element.find_elements(selector).await?.into_iter().next() else {
        return Ok(None);
    };

    let ret = child.call_js_fn(TEXT_CONTENT_JS, false).await?;
    Ok(as_text(ret.result.value))
}

/// A new tab the user could have reached from `opener`
fn opened_by(info: &TargetInfo, opener: &TargetId) -> bool {
    info.r#type == "page" && info.opener_id.as_ref() == Some(opener)
}

fn as_text(value: Option<serde_json::Value>) -> Option<String> {
    value.and_then(|v| v.as_str().map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_reads_strings_only() {
        assert_eq!(
            as_text(Some(serde_json::json!("Дата рождения"))),
            Some("Дата рождения".to_string())
        );
        assert_eq!(as_text(Some(serde_json::Value::Null)), None);
        assert_eq!(as_text(Some(serde_json::json!(42))), None);
        assert_eq!(as_text(None), None);
    }

    #[test]
    fn test_fill_value_js_keeps_cyrillic_query_verbatim() {
        let js = fill_value_js("Иванов Иван Иванович");

        assert!(js.contains("this.value = \"Иванов Иван Иванович\";"));
        assert!(js.contains("new Event('input'"));
        assert!(js.starts_with("function() {"));
        assert!(js.ends_with('}'));
    }

    #[test]
    fn test_fill_value_js_escapes_query() {
        let js = fill_value_js("O'Brien \"Jr\" \\ end\n");

        assert!(js.contains(r#"this.value = "O'Brien \"Jr\" \\ end\n";"#));
    }

    fn target_info(id: &str, kind: &str, opener: Option<&str>) -> TargetInfo {
        let mut info = serde_json::json!({
            "targetId": id,
            "type": kind,
            "title": "",
            "url": "about:blank",
            "attached": false,
            "canAccessOpener": false,
        });
        if let Some(opener) = opener {
            info["openerId"] = serde_json::json!(opener);
        }
        serde_json::from_value(info).unwrap()
    }

    #[test]
    fn test_opened_by_requires_page_from_search_tab() {
        let search = target_info("SEARCH", "page", None);
        let opener = &search.target_id;

        assert!(opened_by(&target_info("DETAIL", "page", Some("SEARCH")), opener));
        assert!(!opened_by(&target_info("OTHER", "page", Some("ELSEWHERE")), opener));
        assert!(!opened_by(&target_info("ORPHAN", "page", None), opener));
        assert!(!opened_by(
            &target_info("WORKER", "service_worker", Some("SEARCH")),
            opener
        ));
    }
}
