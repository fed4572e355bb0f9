//! Browser automation using chromiumoxide.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    AuthChallengeResponse, AuthChallengeResponseResponse, ContinueRequestParams,
    ContinueWithAuthParams, EnableParams, EventAuthRequired, EventRequestPaused,
};
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use super::page::{LoadState, PageDriver, Response};
use super::proxy::ProxyConfig;
use crate::config::BrowserSettings;

/// Quiet period used to approximate network idle
const NETWORK_IDLE_QUIET: Duration = Duration::from_millis(500);
const READY_STATE_POLL: Duration = Duration::from_millis(100);
/// Status of the main document, 0 when the browser does not expose it
const RESPONSE_STATUS_JS: &str =
    "(performance.getEntriesByType('navigation')[0] || {}).responseStatus || 0";

/// Browser wrapper for web scraping
pub struct Browser {
    browser: ChromeBrowser,
    handle: tokio::task::JoinHandle<()>,
    settings: BrowserSettings,
}

impl Browser {
    /// Launch a new browser instance
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        // Find Chrome executable
        let chrome_path = match &settings.chrome_path {
            Some(path) => path.as_str(),
            None if cfg!(target_os = "macos") => {
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"
            }
            None if cfg!(target_os = "windows") => {
                "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe"
            }
            None => "google-chrome",
        };

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .no_sandbox()
            .disable_default_args()
            .request_timeout(Duration::from_secs(settings.timeout_secs))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--mute-audio")
            .window_size(settings.window_width, settings.window_height);

        builder = if settings.headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };

        let config = builder
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = ChromeBrowser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        // Spawn handler task - must keep running for browser to work
        let handle = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => continue, // Don't break on errors
                    None => break,
                }
            }
        });

        info!(headless = settings.headless, "Browser launched");

        Ok(Self {
            browser,
            handle,
            settings: settings.clone(),
        })
    }

    /// Open a page in a fresh browser context, routed through `proxy` if given
    pub async fn new_page(&mut self, proxy: Option<ProxyConfig>) -> Result<BrowserPage> {
        let mut context_params = CreateBrowserContextParams::builder();
        if let Some(proxy) = &proxy {
            info!("Using proxy {}", proxy.server());
            context_params = context_params.proxy_server(proxy.server());
        }

        let context_id = self
            .browser
            .create_browser_context(context_params.build())
            .await
            .map_err(|e| anyhow!("Failed to create browser context: {}", e))?;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id)
            .build()
            .map_err(|e| anyhow!("Failed to build target params: {}", e))?;

        let page = self
            .browser
            .new_page(target)
            .await
            .map_err(|e| anyhow!("Failed to create new page: {}", e))?;

        if let Some((username, password)) = proxy.as_ref().and_then(|p| p.credentials()) {
            answer_proxy_auth(&page, username.to_string(), password.to_string()).await?;
        }

        Ok(BrowserPage {
            page,
            timeout: Duration::from_secs(self.settings.timeout_secs),
            slow_mo: Duration::from_millis(self.settings.slow_mo_ms),
        })
    }

    /// Close the browser
    pub async fn close(mut self) -> Result<()> {
        let _ = self.browser.close().await;
        self.handle.abort();
        info!("Browser closed");
        Ok(())
    }
}

/// Intercept requests on `page` so proxy auth challenges get the credentials
async fn answer_proxy_auth(page: &Page, username: String, password: String) -> Result<()> {
    let mut auth_events = page
        .event_listener::<EventAuthRequired>()
        .await
        .map_err(|e| anyhow!("Failed to listen for auth challenges: {}", e))?;
    let mut paused_events = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(|e| anyhow!("Failed to listen for paused requests: {}", e))?;

    let auth_page = page.clone();
    tokio::spawn(async move {
        while let Some(event) = auth_events.next().await {
            let response = AuthChallengeResponse {
                response: AuthChallengeResponseResponse::ProvideCredentials,
                username: Some(username.clone()),
                password: Some(password.clone()),
            };
            let params = ContinueWithAuthParams::new(event.request_id.clone(), response);
            if let Err(e) = auth_page.execute(params).await {
                warn!("Failed to answer proxy auth challenge: {}", e);
            }
        }
    });

    let paused_page = page.clone();
    tokio::spawn(async move {
        while let Some(event) = paused_events.next().await {
            let params = ContinueRequestParams::new(event.request_id.clone());
            if let Err(e) = paused_page.execute(params).await {
                debug!("Failed to continue paused request: {}", e);
            }
        }
    });

    page.execute(EnableParams::builder().handle_auth_requests(true).build())
        .await
        .map_err(|e| anyhow!("Failed to enable request interception: {}", e))?;

    Ok(())
}

/// A chromiumoxide page driven by the pipeline
pub struct BrowserPage {
    page: Page,
    timeout: Duration,
    slow_mo: Duration,
}

impl BrowserPage {
    async fn pause(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }

    async fn ready_state(&self) -> Result<String> {
        let state = self
            .page
            .evaluate("document.readyState")
            .await
            .map_err(|e| anyhow!("Failed to read document.readyState: {}", e))?
            .into_value::<String>()
            .context("document.readyState is not a string")?;
        Ok(state)
    }

    /// HTTP status of the current document, if the browser reports it
    async fn response_status(&self) -> Option<u16> {
        let status = self
            .page
            .evaluate(RESPONSE_STATUS_JS)
            .await
            .ok()?
            .into_value::<u16>()
            .ok()?;
        (status != 0).then_some(status)
    }

    /// Close the page
    pub async fn close(self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| anyhow!("Failed to close page: {}", e))
    }
}

#[async_trait]
impl PageDriver for BrowserPage {
    async fn wait_for_load(&self, state: LoadState) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let ready_state = self.ready_state().await?;
            if state.is_reached_by(&ready_state) {
                break;
            }
            if Instant::now() >= deadline {
                return Err(anyhow!(
                    "Timeout {}ms exceeded waiting for {} (readyState: {})",
                    self.timeout.as_millis(),
                    state,
                    ready_state
                ));
            }
            sleep(READY_STATE_POLL).await;
        }

        if state == LoadState::NetworkIdle {
            sleep(NETWORK_IDLE_QUIET).await;
        }
        Ok(())
    }

    async fn goto(&self, url: &str) -> Result<Response> {
        self.pause().await;
        match timeout(self.timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(Response {
                status: self.response_status().await,
            }),
            Ok(Err(e)) => Err(anyhow!("Navigation to {} failed: {}", url, e)),
            Err(_) => Err(anyhow!(
                "Timeout {}ms exceeded navigating to {}",
                self.timeout.as_millis(),
                url
            )),
        }
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| anyhow!("Failed to get page content: {}", e))
    }

    async fn scroll_into_view(&self, selector: &str) -> Result<()> {
        self.pause().await;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| anyhow!("No element for {}: {}", selector, e))?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| anyhow!("Failed to scroll to {}: {}", selector, e))?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.pause().await;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| anyhow!("No element for {}: {}", selector, e))?;
        element
            .click()
            .await
            .map_err(|e| anyhow!("Failed to focus {}: {}", selector, e))?;
        element
            .type_str(text)
            .await
            .map_err(|e| anyhow!("Failed to type into {}: {}", selector, e))?;
        Ok(())
    }
}
