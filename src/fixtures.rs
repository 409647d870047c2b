//! TOML fixture files that seed a [`ThreadStore`].
//!
//! ```toml
//! [[pages]]
//! id = "page-jp"
//! connected = true
//! expiry_status = "ExpiringSoon"
//! linked_cas = ["ca-1"]
//!
//! [[threads]]
//! id = "t-1"
//! page_id = "page-jp"
//! last_inbound_at = "2026-03-01T09:00:00Z"
//!
//! [overrides]
//! t-2 = "requires_tag"
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::messaging::page::Page;
use crate::messaging::sendability::SendabilityOverrides;
use crate::messaging::store::ThreadStore;
use crate::messaging::thread::{Message, MessageThread};

/// Errors from loading fixture files.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixtures at {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The fixture file is not valid TOML for the expected shape.
    #[error("failed to parse fixtures: {0}")]
    Parse(#[from] toml::de::Error),

    /// A thread or message references a missing record.
    #[error("dangling reference: {0}")]
    DanglingReference(String),
}

/// Raw fixture document.
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    /// Pages to seed.
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Threads to seed.
    #[serde(default)]
    pub threads: Vec<MessageThread>,
    /// Message history to seed.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Pinned sendability states keyed by thread id.
    #[serde(default)]
    pub overrides: SendabilityOverrides,
}

impl Fixtures {
    /// Build a store from these fixtures.
    ///
    /// Threads may reference unknown pages (the engine then applies no page
    /// restriction), but messages must reference a seeded thread.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::DanglingReference`] for a message whose thread
    /// is not part of the fixtures.
    pub fn into_store(self) -> Result<ThreadStore, FixtureError> {
        let mut store = ThreadStore::new();
        for page in self.pages {
            store.insert_page(page);
        }
        for thread in self.threads {
            store.insert_thread(thread);
        }
        for message in self.messages {
            if store.thread(&message.thread_id).is_none() {
                return Err(FixtureError::DanglingReference(format!(
                    "message {} references unknown thread {}",
                    message.id, message.thread_id
                )));
            }
            store.insert_message(message);
        }
        store.set_overrides(self.overrides);
        Ok(store)
    }
}

/// Parse fixtures from TOML text into a store.
///
/// # Errors
///
/// Returns an error if the text is not valid fixture TOML or references
/// missing records.
pub fn parse_fixtures(contents: &str) -> Result<ThreadStore, FixtureError> {
    let fixtures: Fixtures = toml::from_str(contents)?;
    debug!(
        pages = fixtures.pages.len(),
        threads = fixtures.threads.len(),
        overrides = fixtures.overrides.len(),
        "fixtures parsed"
    );
    fixtures.into_store()
}

/// Load fixtures from a TOML file into a store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_fixtures(path: &Path) -> Result<ThreadStore, FixtureError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_fixtures(&contents)
}
