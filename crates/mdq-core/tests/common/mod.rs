//! Shared scripted fetch client for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use mdq_core::fetch::{FetchClient, FetchError, ProgressEvent};

/// What one URL should do when probed and fetched.
#[derive(Clone)]
pub struct Script {
    pub title: &'static str,
    pub fetch_error: Option<&'static str>,
}

pub struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    delay: Duration,
}

impl ScriptedFetcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            scripts: HashMap::new(),
            delay,
        }
    }

    pub fn succeed(mut self, url: &str, title: &'static str) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script {
                title,
                fetch_error: None,
            },
        );
        self
    }

    pub fn fail(mut self, url: &str, title: &'static str, error: &'static str) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script {
                title,
                fetch_error: Some(error),
            },
        );
        self
    }

    pub fn into_client(self) -> Arc<dyn FetchClient> {
        Arc::new(self)
    }
}

#[async_trait]
impl FetchClient for ScriptedFetcher {
    async fn probe(&self, url: &str) -> Result<String, FetchError> {
        match self.scripts.get(url) {
            Some(script) => Ok(script.title.to_string()),
            None => Err(FetchError::Probe("unscripted url".to_string())),
        }
    }

    async fn fetch(
        &self,
        url: &str,
        _title: &str,
        progress: mpsc::UnboundedSender<ProgressEvent>,
    ) -> Result<(), FetchError> {
        tokio::time::sleep(self.delay).await;
        let _ = progress.send(ProgressEvent::Downloading("25.0%".to_string()));
        tokio::time::sleep(self.delay).await;
        match self.scripts.get(url).and_then(|s| s.fetch_error) {
            None => {
                let _ = progress.send(ProgressEvent::Finished);
                Ok(())
            }
            Some(error) => Err(FetchError::Download(error.to_string())),
        }
    }
}
