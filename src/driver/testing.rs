//! Scripted page driver for exercising the crawler without a browser.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{ArticleSummary, ImageDescriptor};
use crate::driver::{DriverError, DriverErrorKind, ExtractMode, Extraction, PageDriver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String, ExtractMode),
    Fetch(String),
    Close,
}

/// Shared view of every call a [`ScriptedDriver`] received
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn all(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|c| match c {
                Call::Navigate(url, _) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn touched(&self, url: &str) -> bool {
        self.all().iter().any(|c| match c {
            Call::Navigate(u, _) | Call::Fetch(u) => u == url,
            Call::Close => false,
        })
    }

    pub fn closed(&self) -> bool {
        self.all().contains(&Call::Close)
    }
}

#[derive(Default)]
pub struct ScriptedDriver {
    lists: HashMap<String, Vec<ArticleSummary>>,
    details: HashMap<String, Vec<ImageDescriptor>>,
    binaries: HashMap<String, Vec<u8>>,
    failures: Mutex<HashMap<String, VecDeque<DriverErrorKind>>>,
    panics: HashSet<String>,
    calls: CallLog,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, url: impl Into<String>, articles: Vec<ArticleSummary>) -> Self {
        self.lists.insert(url.into(), articles);
        self
    }

    pub fn with_detail(mut self, url: impl Into<String>, images: Vec<ImageDescriptor>) -> Self {
        self.details.insert(url.into(), images);
        self
    }

    pub fn with_binary(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.binaries.insert(url.into(), bytes.into());
        self
    }

    /// Make the next calls for `url` fail with `kinds`, in order
    pub fn failing(self, url: impl Into<String>, kinds: &[DriverErrorKind]) -> Self {
        self.failures
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .extend(kinds.iter().copied());
        self
    }

    pub fn panicking_on(mut self, url: impl Into<String>) -> Self {
        self.panics.insert(url.into());
        self
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }

    fn injected(&self, url: &str) -> Result<(), DriverError> {
        if self.panics.contains(url) {
            panic!("scripted panic at {url}");
        }

        let next = self
            .failures
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(kind) => Err(DriverError::new(kind, format!("scripted failure at {url}"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate_and_extract(
        &self,
        url: &str,
        mode: ExtractMode,
    ) -> Result<Extraction, DriverError> {
        self.calls.push(Call::Navigate(url.to_string(), mode));
        self.injected(url)?;

        Ok(match mode {
            ExtractMode::Articles => {
                Extraction::Articles(self.lists.get(url).cloned().unwrap_or_default())
            }
            ExtractMode::Images => {
                Extraction::Images(self.details.get(url).cloned().unwrap_or_default())
            }
        })
    }

    async fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, DriverError> {
        self.calls.push(Call::Fetch(url.to_string()));
        self.injected(url)?;

        self.binaries.get(url).cloned().ok_or_else(|| {
            DriverError::new(DriverErrorKind::HttpStatus(404), format!("no bytes for {url}"))
        })
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.calls.push(Call::Close);
        Ok(())
    }
}
