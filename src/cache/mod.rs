//! Session-lifetime memo store for remote content.
//!
//! Three tiers, each keyed by structured identity:
//!
//! | Tier        | Key             | Value                    |
//! |-------------|-----------------|--------------------------|
//! | `snapshots` | `RepositoryRef` | `RepositorySnapshot`     |
//! | `listings`  | `Coordinate`    | `Arc<[ListingEntry]>`    |
//! | `files`     | `Coordinate`    | `FileContent`            |
//!
//! A populated entry is never overwritten or evicted.

mod memo;

pub use memo::{MemoTier, TierStats};

use std::sync::Arc;

use crate::core::{Coordinate, FileContent, ListingEntry, RepositoryRef, RepositorySnapshot};

/// Memo tiers shared by one navigation session.
pub struct ContentCache {
    pub snapshots: MemoTier<RepositoryRef, RepositorySnapshot>,
    pub listings: MemoTier<Coordinate, Arc<[ListingEntry]>>,
    pub files: MemoTier<Coordinate, FileContent>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self {
            snapshots: MemoTier::new("snapshots"),
            listings: MemoTier::new("listings"),
            files: MemoTier::new("files"),
        }
    }

    /// Print hit/miss counters of every tier (verbose only).
    pub fn log_stats(&self) {
        for stats in [
            self.snapshots.stats(),
            self.listings.stats(),
            self.files.stats(),
        ] {
            crate::debug!("cache"; "{stats}");
        }
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}
