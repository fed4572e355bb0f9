//! Page transitions with retry.

use tracing::{debug, info, warn};

use super::page::{LoadState, PageDriver, Response};
use crate::retry::{retry, RetryPolicy};

/// Wait for `state` on the current page, then go to `url`.
///
/// An error status is not a failure: the page did load and is returned as
/// is. Returns `None` when every attempt failed; the page is then left
/// wherever the last attempt got it.
pub async fn navigate<P>(page: &P, url: &str, state: LoadState, policy: &RetryPolicy) -> Option<Response>
where
    P: PageDriver + ?Sized,
{
    info!("Visiting the url -> {}", url);

    retry(policy, &format!("Navigation to {}", url), || async move {
        page.wait_for_load(state).await?;
        let response = page.goto(url).await?;
        if response.ok() {
            debug!("Page done loading ({})", state);
        } else if let Some(status) = response.status {
            warn!("{} answered with status {}", url, status);
        }
        Ok::<_, anyhow::Error>(response)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Page whose `goto` fails a fixed number of times
    struct FlakyPage {
        failures_left: Mutex<u32>,
        status: u16,
        calls: Mutex<Vec<String>>,
    }

    impl FlakyPage {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                status: 200,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_status(mut self, status: u16) -> Self {
            self.status = status;
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageDriver for FlakyPage {
        async fn wait_for_load(&self, state: LoadState) -> Result<()> {
            self.calls.lock().unwrap().push(format!("wait:{}", state));
            Ok(())
        }

        async fn goto(&self, url: &str) -> Result<Response> {
            self.calls.lock().unwrap().push(format!("goto:{}", url));
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                bail!("Timeout 45000ms exceeded");
            }
            Ok(Response::new(self.status))
        }

        async fn content(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn scroll_into_view(&self, _selector: &str) -> Result<()> {
            Ok(())
        }

        async fn fill(&self, _selector: &str, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_waits_before_navigating() {
        let page = FlakyPage::new(0);
        let result = navigate(&page, "https://a.test/", LoadState::DomContentLoaded, &RetryPolicy::default()).await;

        assert!(result.is_some_and(|r| r.ok()));
        assert_eq!(page.calls(), vec!["wait:domcontentloaded", "goto:https://a.test/"]);
    }

    #[tokio::test]
    async fn test_error_status_is_reported_not_retried() {
        let page = FlakyPage::new(0).with_status(404);
        let result = navigate(&page, "https://a.test/gone", LoadState::Load, &RetryPolicy::attempts(3)).await;

        assert_eq!(result, Some(Response::new(404)));
        assert!(!result.unwrap().ok());
        assert_eq!(page.calls().iter().filter(|c| c.starts_with("goto")).count(), 1);
    }

    #[tokio::test]
    async fn test_recovers_from_timeout() {
        let page = FlakyPage::new(2);
        let result = navigate(&page, "https://a.test/", LoadState::Load, &RetryPolicy::attempts(3)).await;

        assert!(result.is_some());
        assert_eq!(page.calls().iter().filter(|c| c.starts_with("goto")).count(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_silently() {
        let page = FlakyPage::new(10);
        let result = navigate(&page, "https://a.test/", LoadState::Load, &RetryPolicy::attempts(3)).await;

        assert!(result.is_none());
        assert_eq!(page.calls().iter().filter(|c| c.starts_with("goto")).count(), 3);
    }
}
