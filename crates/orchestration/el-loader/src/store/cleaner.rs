//! Output path cleaning.
//!
//! Result prefixes are cleared immediately before a query writes to them,
//! so a re-run fully overwrites the previous run's files instead of
//! accumulating stale objects next to fresh ones.

use el_error::{ElError, Result};
use tracing::{debug, info};

use super::ObjectStore;

/// Delete every object under `prefix`, returning how many were removed.
///
/// A prefix with no objects (including one that has never been written)
/// is a successful no-op. Listing or deletion failures propagate and are
/// fatal for the step that requested the clean.
///
/// The empty prefix is refused: deletion is irreversible, and clearing
/// `""` would wipe the whole bucket.
pub async fn clear_prefix<S: ObjectStore + ?Sized>(store: &S, prefix: &str) -> Result<usize> {
    if prefix.is_empty() {
        return Err(ElError::Config(
            "refusing to clear an empty prefix (would delete the entire bucket)".to_string(),
        ));
    }

    let keys = store.list(prefix).await?;

    if keys.is_empty() {
        debug!(prefix = %prefix, "Prefix already empty, nothing to clear");
    }
    store.delete(&keys).await?;

    if !keys.is_empty() {
        info!(prefix = %prefix, removed = keys.len(), "Cleared output prefix");
    }
    Ok(keys.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted in-memory store recording delete calls.
    struct FakeStore {
        objects: Mutex<Vec<String>>,
        delete_calls: Mutex<usize>,
    }

    impl FakeStore {
        fn with_objects(keys: &[&str]) -> Self {
            Self {
                objects: Mutex::new(keys.iter().map(|k| k.to_string()).collect()),
                delete_calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn list(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .iter()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        async fn delete(&self, keys: &[String]) -> Result<()> {
            *self.delete_calls.lock().unwrap() += 1;
            self.objects
                .lock()
                .unwrap()
                .retain(|k| !keys.contains(k));
            Ok(())
        }

        async fn get(&self, _key: &str) -> Result<Vec<u8>> {
            unimplemented!("not used by cleaner tests")
        }
    }

    #[tokio::test]
    async fn test_clear_populated_prefix() {
        let store = FakeStore::with_objects(&[
            "events/brand=x/part-0.csv",
            "events/brand=x/part-1.csv",
            "dau/brand=x/part-0.csv",
        ]);

        let removed = clear_prefix(&store, "events/").await.unwrap();
        assert_eq!(removed, 2);

        // Objects outside the prefix survive
        let remaining = store.objects.lock().unwrap().clone();
        assert_eq!(remaining, vec!["dau/brand=x/part-0.csv"]);
    }

    #[tokio::test]
    async fn test_clear_empty_prefix_is_noop() {
        let store = FakeStore::with_objects(&[]);
        let removed = clear_prefix(&store, "events/").await.unwrap();
        assert_eq!(removed, 0);
        // The no-op delete is still issued
        assert_eq!(*store.delete_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_refuses_blank_prefix() {
        let store = FakeStore::with_objects(&["a", "b"]);
        let result = clear_prefix(&store, "").await;
        assert!(matches!(result, Err(ElError::Config(_))));
        // Nothing was touched
        assert_eq!(store.objects.lock().unwrap().len(), 2);
    }
}
