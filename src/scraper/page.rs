//! Browser engine boundary.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Page load condition to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The load event has fired
    #[default]
    Load,
    /// The document has been parsed
    DomContentLoaded,
    /// Loaded, plus a quiet period without network traffic
    NetworkIdle,
}

impl LoadState {
    /// Whether a `document.readyState` value satisfies this condition
    pub fn is_reached_by(&self, ready_state: &str) -> bool {
        match self {
            LoadState::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
            LoadState::Load | LoadState::NetworkIdle => ready_state == "complete",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        };
        f.write_str(name)
    }
}

/// Main document response of a committed navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// HTTP status, when the engine reports one
    pub status: Option<u16>,
}

impl Response {
    #[cfg(test)]
    pub fn new(status: u16) -> Self {
        Self {
            status: Some(status),
        }
    }

    /// 2xx status
    pub fn ok(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}

/// What the pipeline needs from a browser page.
///
/// DOM lookups work on the HTML snapshot returned by [`PageDriver::content`],
/// so any engine that can navigate, type and serialize its DOM fits.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Wait until the current document reaches `state`
    async fn wait_for_load(&self, state: LoadState) -> Result<()>;

    /// Navigate to `url` and wait for the navigation to commit
    async fn goto(&self, url: &str) -> Result<Response>;

    /// Serialized DOM of the current document
    async fn content(&self) -> Result<String>;

    /// Scroll the first element matching `selector` into view
    async fn scroll_into_view(&self, selector: &str) -> Result<()>;

    /// Focus the first element matching `selector` and type `text` into it
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_matching() {
        assert!(LoadState::DomContentLoaded.is_reached_by("interactive"));
        assert!(LoadState::DomContentLoaded.is_reached_by("complete"));
        assert!(!LoadState::DomContentLoaded.is_reached_by("loading"));

        assert!(LoadState::Load.is_reached_by("complete"));
        assert!(!LoadState::Load.is_reached_by("interactive"));
        assert!(!LoadState::NetworkIdle.is_reached_by("interactive"));
    }

    #[test]
    fn test_default_is_load() {
        assert_eq!(LoadState::default(), LoadState::Load);
        assert_eq!(LoadState::DomContentLoaded.to_string(), "domcontentloaded");
    }

    #[test]
    fn test_response_ok() {
        assert!(Response::new(200).ok());
        assert!(Response::new(204).ok());
        assert!(!Response::new(404).ok());
        assert!(!Response::new(503).ok());
        assert!(!Response::default().ok());
    }
}
