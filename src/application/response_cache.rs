//! In-memory TTL cache for tool outputs.
//!
//! Entries are keyed by tool name plus the normalised arguments. Each entry
//! carries its own TTL and is never served once it has elapsed.

use std::fmt;
use std::time::{Duration, Instant};

use moka::future::Cache;
use moka::Expiry;

use crate::domain::tools::ToolArguments;

/// Default upper bound on cached entries.
pub const DEFAULT_MAX_ENTRIES: u64 = 1024;

#[derive(Debug, Clone)]
struct CachedOutput {
    output: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, CachedOutput> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedOutput,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedOutput,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Shared cache of successful tool outputs.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedOutput>,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ResponseCache {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries.max(1))
            .expire_after(PerEntryTtl)
            .build();
        Self { entries }
    }

    fn key(tool_name: &str, arguments: &ToolArguments) -> String {
        format!("{}:{}", tool_name, arguments.normalized_key())
    }

    /// Returns the cached output if it has not expired.
    pub async fn get(&self, tool_name: &str, arguments: &ToolArguments) -> Option<String> {
        self.entries
            .get(&Self::key(tool_name, arguments))
            .await
            .map(|cached| cached.output)
    }

    /// Stores an output for `ttl`.
    pub async fn insert(
        &self,
        tool_name: &str,
        arguments: &ToolArguments,
        output: impl Into<String>,
        ttl: Duration,
    ) {
        let cached = CachedOutput {
            output: output.into(),
            ttl,
        };
        self.entries.insert(Self::key(tool_name, arguments), cached).await;
    }

    /// Number of live entries, after pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
