use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::{BrowserConfig, RenderedTableConfig};
use crate::error::{MenuError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One live browser with at most one open page.
#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// `Ok(false)` when `selector` did not appear within `limit`.
    async fn wait_for(&mut self, selector: &str, limit: Duration) -> Result<bool>;

    async fn click(&mut self, selector: &str) -> Result<()>;

    async fn content(&mut self) -> Result<String>;

    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Load `url` in a fresh session, reveal the week and return the rendered
/// HTML. The session is closed on every path out of here.
pub async fn render_page(
    launcher: &dyn BrowserLauncher,
    url: &str,
    settings: &RenderedTableConfig,
    wait_limit: Duration,
) -> Result<String> {
    let mut session = launcher.launch().await?;
    let rendered = drive_session(session.as_mut(), url, settings, wait_limit).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close browser session for {}: {}", url, e);
    }

    rendered
}

async fn drive_session(
    session: &mut dyn BrowserSession,
    url: &str,
    settings: &RenderedTableConfig,
    wait_limit: Duration,
) -> Result<String> {
    session.goto(url).await?;

    if session.wait_for(&settings.wait_selector, wait_limit).await? {
        if let Err(e) = session.click(&settings.reveal_selector).await {
            warn!("Could not click {} on {}: {}", settings.reveal_selector, url, e);
        }
    } else {
        warn!(
            "Timed out after {:?} waiting for {} on {}, reading the page as is",
            wait_limit, settings.wait_selector, url
        );
    }

    session.content().await
}

pub struct ChromiumLauncher {
    settings: BrowserConfig,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserConfig) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let mut builder = ChromeConfig::builder();
        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }
        let chrome_config = builder
            .build()
            .map_err(|e| MenuError::fetch(format!("invalid browser settings: {e}")))?;

        info!("Launching headless browser");
        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| MenuError::fetch(format!("failed to launch browser: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler,
            page: None,
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| MenuError::fetch("no page loaded in browser session"))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| MenuError::fetch(format!("failed to open {url}: {e}")))?;
        self.page = Some(page);
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, limit: Duration) -> Result<bool> {
        let page = self.page()?;
        let appeared = timeout(limit, async {
            while page.find_element(selector).await.is_err() {
                sleep(POLL_INTERVAL).await;
            }
        })
        .await;

        Ok(appeared.is_ok())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let page = self.page()?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|e| MenuError::fetch(format!("no {selector} to click: {e}")))?;
        element
            .click()
            .await
            .map_err(|e| MenuError::fetch(format!("click on {selector} failed: {e}")))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| MenuError::fetch(format!("failed to read rendered page: {e}")))
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Closing page failed: {}", e);
            }
        }
        self.browser
            .close()
            .await
            .map_err(|e| MenuError::fetch(format!("failed to close browser: {e}")))?;
        self.browser
            .wait()
            .await
            .map_err(|e| MenuError::fetch(format!("browser did not exit: {e}")))?;
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Script {
        calls: Arc<Mutex<Vec<String>>>,
        container_appears: bool,
        fail_goto: bool,
    }

    struct ScriptedSession(Script);

    struct ScriptedLauncher(Script);

    #[async_trait]
    impl BrowserLauncher for ScriptedLauncher {
        async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
            self.0.calls.lock().unwrap().push("launch".to_string());
            Ok(Box::new(ScriptedSession(self.0.clone())))
        }
    }

    #[async_trait]
    impl BrowserSession for ScriptedSession {
        async fn goto(&mut self, url: &str) -> Result<()> {
            self.0.calls.lock().unwrap().push(format!("goto {url}"));
            if self.0.fail_goto {
                return Err(MenuError::fetch("net::ERR_NAME_NOT_RESOLVED"));
            }
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, _limit: Duration) -> Result<bool> {
            self.0.calls.lock().unwrap().push(format!("wait {selector}"));
            Ok(self.0.container_appears)
        }

        async fn click(&mut self, selector: &str) -> Result<()> {
            self.0.calls.lock().unwrap().push(format!("click {selector}"));
            Ok(())
        }

        async fn content(&mut self) -> Result<String> {
            self.0.calls.lock().unwrap().push("content".to_string());
            Ok("<html></html>".to_string())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            self.0.calls.lock().unwrap().push("close".to_string());
            Ok(())
        }
    }

    fn calls(script: &Script) -> Vec<String> {
        script.calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn reveals_the_week_before_reading() {
        let config = Config::defaults().unwrap();
        let script = Script {
            container_appears: true,
            ..Default::default()
        };
        let launcher = ScriptedLauncher(script.clone());

        let html = render_page(&launcher, "https://menu.test", &config.rendered_table, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(html, "<html></html>");
        assert_eq!(
            calls(&script),
            vec![
                "launch",
                "goto https://menu.test",
                "wait div.cp-week",
                "click button.cp-week__toggle",
                "content",
                "close",
            ]
        );
    }

    #[tokio::test]
    async fn timeout_still_reads_the_page() {
        let config = Config::defaults().unwrap();
        let script = Script::default();
        let launcher = ScriptedLauncher(script.clone());

        render_page(&launcher, "https://menu.test", &config.rendered_table, Duration::from_secs(1))
            .await
            .unwrap();

        let calls = calls(&script);
        assert!(!calls.iter().any(|c| c.starts_with("click")));
        assert_eq!(calls.last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn session_is_closed_when_navigation_fails() {
        let config = Config::defaults().unwrap();
        let script = Script {
            fail_goto: true,
            ..Default::default()
        };
        let launcher = ScriptedLauncher(script.clone());

        let err = render_page(&launcher, "https://menu.test", &config.rendered_table, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(err.is_fetch());
        assert_eq!(calls(&script), vec!["launch", "goto https://menu.test", "close"]);
    }
}
