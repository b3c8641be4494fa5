//! Payment method logo URLs and a bounded cache for fetched assets.
//!
//! Logos are served pre-rendered per size and screen density, so the URL
//! carries all of that and the host only performs a plain GET. The cache is
//! owned by the host and keyed by the full URL; it holds whatever decoded
//! asset type the host uses.

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

/// Served logo heights.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogoSize {
    /// Height of 26dp.
    #[default]
    Small,
    /// Height of 50dp.
    Medium,
    /// Height of 100dp.
    Large,
}

/// Screen density buckets the logo CDN serves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Density {
    Low,
    Medium,
    High,
    ExtraHigh,
    ExtraExtraHigh,
    ExtraExtraExtraHigh,
}

impl Density {
    /// Buckets a screen density given in dots per inch.
    pub const fn from_dpi(dpi: u32) -> Self {
        if dpi <= 120 {
            Self::Low
        } else if dpi <= 160 {
            Self::Medium
        } else if dpi <= 240 {
            Self::High
        } else if dpi <= 320 {
            Self::ExtraHigh
        } else if dpi <= 480 {
            Self::ExtraExtraHigh
        } else {
            Self::ExtraExtraExtraHigh
        }
    }

    /// File name suffix for this bucket. `Medium` is the unsuffixed baseline.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Low => "-ldpi",
            Self::Medium => "",
            Self::High => "-hdpi",
            Self::ExtraHigh => "-xhdpi",
            Self::ExtraExtraHigh => "-xxhdpi",
            Self::ExtraExtraExtraHigh => "-xxxhdpi",
        }
    }
}

/// Builds logo URLs for one environment and screen density.
#[derive(Clone, Debug)]
pub struct LogoApi {
    base_url: String,
    density: Density,
}

impl LogoApi {
    /// `base_url` is the environment base URL and must end with a `/`.
    pub fn new(base_url: impl Into<String>, density: Density) -> Self {
        Self {
            base_url: base_url.into(),
            density,
        }
    }

    /// URL of the logo for `tx_variant`, optionally narrowed to a sub-variant
    /// (an issuer or brand under the main payment method).
    pub fn logo_url(
        &self,
        tx_variant: &str,
        tx_sub_variant: Option<&str>,
        size: Option<LogoSize>,
    ) -> String {
        let size = size.unwrap_or_default();
        let extension = self.density.extension();
        match tx_sub_variant.filter(|sub| !sub.is_empty()) {
            Some(sub) => format!(
                "{}images/logos/{size}/{tx_variant}/{sub}{extension}.png",
                self.base_url
            ),
            None => format!(
                "{}images/logos/{size}/{tx_variant}{extension}.png",
                self.base_url
            ),
        }
    }
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum CacheError {
    #[error("could not acquire the lock for the logo cache")]
    CouldNotAcquireLock,
    #[error("entry not found in cache")]
    EntryNotFound,
}

#[derive(Debug)]
struct CacheEntry<T> {
    data: Arc<T>,
    stamp: u64,
}

#[derive(Debug)]
struct CacheState<T> {
    entries: FxHashMap<String, CacheEntry<T>>,
    next_stamp: u64,
}

/// Bounded cache for fetched logo assets, keyed by URL.
///
/// Inserting past the capacity evicts the oldest entries. The host decides
/// what `T` is; entries are shared out as [`Arc`]s so a retrieve never
/// clones the asset itself.
#[derive(Debug)]
pub struct LogoCache<T> {
    state: RwLock<CacheState<T>>,
    capacity: usize,
}

impl<T> LogoCache<T>
where
    T: Send + Sync,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: FxHashMap::default(),
                next_stamp: 0,
            }),
            capacity,
        }
    }

    pub fn present(&self, key: &str) -> Result<bool, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::CouldNotAcquireLock)?;

        Ok(state.entries.contains_key(key))
    }

    pub fn retrieve(&self, key: &str) -> Result<Arc<T>, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::CouldNotAcquireLock)?;

        let entry = state.entries.get(key).ok_or(CacheError::EntryNotFound)?;
        Ok(Arc::clone(&entry.data))
    }

    pub fn save(&self, key: String, data: T) -> Result<(), CacheError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::CouldNotAcquireLock)?;

        let stamp = state.next_stamp;
        state.next_stamp += 1;
        state.entries.insert(
            key,
            CacheEntry {
                data: Arc::new(data),
                stamp,
            },
        );
        evict_over(&mut state.entries, self.capacity);
        Ok(())
    }

    /// Evicts oldest entries until at most `max_entries` remain.
    pub fn trim_to(&self, max_entries: usize) -> Result<(), CacheError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::CouldNotAcquireLock)?;

        evict_over(&mut state.entries, max_entries);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CacheError::CouldNotAcquireLock)?;

        state.entries.clear();
        Ok(())
    }

    pub fn len(&self) -> Result<usize, CacheError> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::CouldNotAcquireLock)?;

        Ok(state.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}

fn evict_over<T>(entries: &mut FxHashMap<String, CacheEntry<T>>, capacity: usize) {
    while entries.len() > capacity {
        let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.stamp)
            .map(|(key, _)| key.clone())
        else {
            return;
        };
        entries.remove(&oldest);
    }
}
