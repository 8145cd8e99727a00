//! Asset loading and per-property asset caching.
//!
//! An asset-valued property (a menu item's `Icon`, a button's `Image`) holds
//! a path. Turning the path into something a widget can display goes through
//! an [`AssetLoader`], and every such property keeps an [`AssetSlot`] that
//! remembers what is currently loaded:
//!
//! - Writing the path that is already stored while an asset is loaded does
//!   nothing.
//! - Any other write stores the path and, unless it is empty, attempts a
//!   load.
//! - A failed load keeps whatever asset was loaded before, and the failure is
//!   recorded on the slot.

use std::fmt;
use std::sync::Arc;

use horizon_blockform_core::AssetLoadError;
use horizon_blockform_core::logging::targets;

/// A resolved asset ready for display.
#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    path: Arc<str>,
    data: Arc<[u8]>,
}

impl Asset {
    /// Create an asset from the path it was loaded from and its bytes.
    pub fn new(path: impl Into<Arc<str>>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    /// The path the asset was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw asset bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("path", &self.path)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Resolves asset paths. Loads are synchronous: they either succeed or fail,
/// with no partial state.
pub trait AssetLoader: Send + Sync {
    /// Load the asset at `path`.
    fn load(&self, path: &str) -> Result<Asset, AssetLoadError>;
}

impl<F> AssetLoader for F
where
    F: Fn(&str) -> Result<Asset, AssetLoadError> + Send + Sync,
{
    fn load(&self, path: &str) -> Result<Asset, AssetLoadError> {
        self(path)
    }
}

/// Outcome of [`AssetSlot::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetUpdate {
    /// Same path with an asset loaded; nothing was attempted.
    Unchanged,
    /// The path is empty; it was stored but nothing was loaded.
    Empty,
    /// A new asset was loaded and is now current.
    Loaded(Asset),
    /// The load failed; the previous asset (if any) is still current.
    Failed(AssetLoadError),
}

/// Cached asset state of one asset-valued property.
#[derive(Debug, Clone, Default)]
pub struct AssetSlot {
    path: String,
    current: Option<Asset>,
    last_error: Option<AssetLoadError>,
    consecutive_failures: u32,
}

impl AssetSlot {
    /// An empty slot with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored path (the last one written, loaded or not).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The asset currently displayed, possibly loaded from an earlier path.
    pub fn current(&self) -> Option<&Asset> {
        self.current.as_ref()
    }

    /// The most recent load failure, cleared by the next successful load.
    pub fn last_error(&self) -> Option<&AssetLoadError> {
        self.last_error.as_ref()
    }

    /// How many loads of the stored path have failed in a row.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Apply a newly written path.
    ///
    /// Failures are logged at warn level, or at error level once the same
    /// path has failed `escalate_after` times in a row.
    pub fn update(&mut self, path: &str, loader: &dyn AssetLoader, escalate_after: Option<u32>) -> AssetUpdate {
        if path == self.path && self.current.is_some() {
            tracing::trace!(target: targets::ASSET, path, "asset already loaded");
            return AssetUpdate::Unchanged;
        }

        if path != self.path {
            self.consecutive_failures = 0;
        }
        self.path = path.to_string();
        if path.is_empty() {
            return AssetUpdate::Empty;
        }

        match loader.load(path) {
            Ok(asset) => {
                tracing::debug!(target: targets::ASSET, path, size = asset.data().len(), "asset loaded");
                self.current = Some(asset.clone());
                self.last_error = None;
                self.consecutive_failures = 0;
                AssetUpdate::Loaded(asset)
            }
            Err(err) => {
                self.consecutive_failures += 1;
                let failures = self.consecutive_failures;
                if escalate_after.is_some_and(|threshold| failures >= threshold) {
                    tracing::error!(target: targets::ASSET, path, failures, error = %err, "unable to load asset");
                } else {
                    tracing::warn!(target: targets::ASSET, path, failures, error = %err, "unable to load asset");
                }
                self.last_error = Some(err.clone());
                AssetUpdate::Failed(err)
            }
        }
    }
}
