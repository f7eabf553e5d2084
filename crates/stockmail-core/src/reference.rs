//! First-observed prices, persisted between runs.
//!
//! The file is a flat JSON object keyed `"<SYMBOL>_reference"`:
//!
//! ```json
//! { "NVDA_reference": 131.38, "TSM_reference": 187.2 }
//! ```
//!
//! A reference is written once, the first time a symbol is priced, and is
//! never updated afterwards; deleting the entry (or the file) re-baselines it.
use crate::{fs, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

pub const DEFAULT_REFERENCE_FILE: &str = "stock_reference.json";

const KEY_SUFFIX: &str = "_reference";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct References(BTreeMap<String, f64>);

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(symbol: &str) -> String {
        format!("{symbol}{KEY_SUFFIX}")
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.0.get(&Self::key(symbol)).copied()
    }

    /// The stored reference for `symbol`, inserting `price` if there is none.
    /// The flag is `true` when an insert happened.
    pub fn get_or_insert(&mut self, symbol: &str, price: f64) -> (f64, bool) {
        let mut inserted = false;
        let reference = *self.0.entry(Self::key(symbol)).or_insert_with(|| {
            inserted = true;
            price
        });
        (reference, inserted)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for References {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(symbol, price)| (Self::key(symbol.as_ref()), price))
                .collect(),
        )
    }
}

/// Where references live between runs. Single writer; runs must not overlap.
pub trait ReferenceStore {
    /// Empty on the first ever run.
    fn load(&self) -> impl Future<Output = Result<References>> + Send;

    /// Replace the stored mapping wholesale.
    fn save(&self, references: &References) -> impl Future<Output = Result<()>> + Send;
}

/// Save `references` only when the run added at least one symbol.
pub async fn persist<S: ReferenceStore>(
    store: &S,
    references: &References,
    changed: bool,
) -> Result<()> {
    if !changed {
        log::info!("No new reference prices; skipping save");
        return Ok(());
    }
    store.save(references).await?;
    log::info!("Saved {} reference prices", references.len());
    Ok(())
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_FILE)
    }
}

impl ReferenceStore for JsonFileStore {
    async fn load(&self) -> Result<References> {
        match fs::read_json(&self.path).await? {
            Some(references) => Ok(references),
            None => {
                log::info!("{} not found; starting with no references", self.path.display());
                Ok(References::new())
            }
        }
    }

    async fn save(&self, references: &References) -> Result<()> {
        fs::write_json(&self.path, references).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        saves: AtomicUsize,
    }

    impl ReferenceStore for CountingStore {
        async fn load(&self) -> Result<References> {
            Ok(References::new())
        }

        async fn save(&self, _references: &References) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn first_price_sticks() {
        let mut refs = References::new();
        assert_eq!(refs.get_or_insert("AAA", 100.0), (100.0, true));
        assert_eq!(refs.get_or_insert("AAA", 250.0), (100.0, false));
        assert_eq!(refs.get("AAA"), Some(100.0));
        assert_eq!(refs.get("BBB"), None);
    }

    #[test]
    fn serializes_as_flat_suffixed_object() {
        let refs: References = [("AAA", 100.0)].into_iter().collect();
        assert_eq!(serde_json::to_string(&refs).unwrap(), r#"{"AAA_reference":100.0}"#);

        let back: References =
            serde_json::from_str(r#"{"AAA_reference": 100.0, "BBB_reference": 12.5}"#).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get("AAA"), Some(100.0));
        assert_eq!(back.get("BBB"), Some(12.5));
    }

    #[tokio::test]
    async fn absent_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(DEFAULT_REFERENCE_FILE));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(DEFAULT_REFERENCE_FILE));
        let refs: References = [("NVDA", 131.38), ("TSM", 187.2), ("AI", 25.01)]
            .into_iter()
            .collect();

        store.save(&refs).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, refs);

        store.save(&loaded).await.unwrap();
        assert_eq!(store.load().await.unwrap(), refs);
    }

    #[tokio::test]
    async fn unchanged_run_does_not_write() {
        let store = CountingStore::default();
        let refs: References = [("AAA", 1.0)].into_iter().collect();

        persist(&store, &refs, false).await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);

        persist(&store, &refs, true).await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }
}
