//! On-disk price cache.
//!
//! Layout: `{cache_dir}/symbol={SYMBOL}/bars.csv` with a `meta.json` sidecar
//! per symbol (date range, bar count, blake3 data hash, source, cached_at).
//!
//! Writes are atomic (write to .tmp, rename into place). A file that fails to
//! parse on load is quarantined (`bars.csv.quarantined`) instead of deleted,
//! so a format regression can be inspected after the fact.

use super::provider::{canonicalize_bars, ClosingBar, DataError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata sidecar for a cached symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub data_hash: String,
    pub source: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// Per-symbol CSV price cache.
pub struct PriceCache {
    cache_dir: PathBuf,
}

impl PriceCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("symbol={symbol}"))
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join("bars.csv")
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join("meta.json")
    }

    /// Write bars for a symbol, replacing any previous cache entry.
    pub fn write(&self, symbol: &str, bars: &[ClosingBar], source: &str) -> Result<(), DataError> {
        if bars.is_empty() {
            return Err(DataError::CacheError("no bars to cache".into()));
        }

        let sym_dir = self.symbol_dir(symbol);
        fs::create_dir_all(&sym_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let path = self.bars_path(symbol);
        let tmp_path = path.with_extension("csv.tmp");

        let mut wtr = csv::Writer::from_path(&tmp_path)
            .map_err(|e| DataError::CacheError(format!("failed to open {tmp_path:?}: {e}")))?;
        for bar in bars {
            wtr.serialize(bar)
                .map_err(|e| DataError::CacheError(format!("csv write: {e}")))?;
        }
        wtr.flush()
            .map_err(|e| DataError::CacheError(format!("csv flush: {e}")))?;
        drop(wtr);

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: bars[0].date,
            end_date: bars[bars.len() - 1].date,
            bar_count: bars.len(),
            data_hash: hash_bars(bars)?,
            source: source.to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(symbol), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load cached bars for a symbol, canonicalized.
    ///
    /// A corrupt file is moved aside to `bars.csv.quarantined` and reported
    /// as a cache error.
    pub fn load(&self, symbol: &str) -> Result<Vec<ClosingBar>, DataError> {
        let path = self.bars_path(symbol);
        if !path.exists() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| DataError::CacheError(format!("failed to open {path:?}: {e}")))?;

        let mut bars = Vec::new();
        for record in rdr.deserialize::<ClosingBar>() {
            match record {
                Ok(bar) => bars.push(bar),
                Err(e) => {
                    self.quarantine(&path);
                    return Err(DataError::CacheError(format!(
                        "corrupt cache for {symbol} (quarantined): {e}"
                    )));
                }
            }
        }

        let bars = canonicalize_bars(bars);
        if bars.is_empty() {
            self.quarantine(&path);
            return Err(DataError::CacheError(format!(
                "empty cache for {symbol} (quarantined)"
            )));
        }
        Ok(bars)
    }

    /// Load the metadata sidecar for a symbol.
    pub fn load_meta(&self, symbol: &str) -> Result<CacheMeta, DataError> {
        let path = self.meta_path(symbol);
        let json = fs::read_to_string(&path).map_err(|_| DataError::NoCachedData {
            symbol: symbol.to_string(),
        })?;
        serde_json::from_str(&json)
            .map_err(|e| DataError::CacheError(format!("meta parse for {symbol}: {e}")))
    }

    /// Symbols currently present in the cache, sorted.
    pub fn list_symbols(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return Vec::new();
        };
        let mut symbols: Vec<String> = entries
            .flatten()
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.strip_prefix("symbol=").map(str::to_string)
            })
            .collect();
        symbols.sort();
        symbols
    }

    /// Whether a symbol has a cache entry.
    pub fn contains(&self, symbol: &str) -> bool {
        self.bars_path(symbol).exists()
    }

    /// Remove a symbol's cache entry entirely.
    pub fn remove(&self, symbol: &str) -> Result<(), DataError> {
        let dir = self.symbol_dir(symbol);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|e| DataError::CacheError(format!("failed to remove {dir:?}: {e}")))?;
        }
        Ok(())
    }

    fn quarantine(&self, path: &Path) {
        let mut quarantined = path.as_os_str().to_owned();
        quarantined.push(".quarantined");
        let _ = fs::rename(path, PathBuf::from(quarantined));
    }
}

/// Deterministic blake3 hash over the bar payload.
fn hash_bars(bars: &[ClosingBar]) -> Result<String, DataError> {
    let bytes = serde_json::to_vec(bars)
        .map_err(|e| DataError::CacheError(format!("hash serialization: {e}")))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
