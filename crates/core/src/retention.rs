//! TTL-based retention sweep of the upload namespace.
//!
//! Object age is encoded in the key itself as a leading
//! `{unix_timestamp}_` segment after the namespace prefix; there is no
//! separate metadata store.

use chrono::Utc;
use tracing::{debug, warn};

use crate::metrics::{SWEEP_DELETED_TOTAL, SWEEP_FAILURES_TOTAL};
use crate::storage::ObjectStore;

/// Parse the embedded unix timestamp from an object key.
///
/// Keys look like `videos/1714000000_My_Clip.mp4`. Anything that does
/// not match the pattern yields `None` and is left alone by the sweep.
pub fn parse_key_timestamp(prefix: &str, key: &str) -> Option<i64> {
    let remainder = key.strip_prefix(prefix)?;
    let (stamp, _) = remainder.split_once('_')?;
    stamp.parse().ok()
}

/// Delete all objects under `prefix` older than `ttl_secs`.
///
/// Runs once per incoming download request, before the new object is
/// written. Individual delete failures are logged and skipped; a list
/// failure aborts the sweep. Nothing here ever propagates an error to
/// the pipeline. Returns the number of objects deleted.
pub async fn sweep(store: &dyn ObjectStore, prefix: &str, ttl_secs: u64) -> usize {
    let keys = match store.list(prefix).await {
        Ok(keys) => keys,
        Err(e) => {
            warn!(prefix = %prefix, error = %e, "retention sweep could not list objects");
            SWEEP_FAILURES_TOTAL.inc();
            return 0;
        }
    };

    let cutoff = Utc::now().timestamp() - ttl_secs as i64;
    let mut deleted = 0;

    for key in keys {
        let Some(stamp) = parse_key_timestamp(prefix, &key) else {
            debug!(key = %key, "skipping object without timestamped key");
            continue;
        };
        if stamp >= cutoff {
            continue;
        }
        match store.delete(&key).await {
            Ok(()) => {
                debug!(key = %key, age_secs = Utc::now().timestamp() - stamp, "swept expired object");
                deleted += 1;
            }
            Err(e) => {
                // Concurrent sweeps may race on the same key; a failed
                // delete is never fatal to the rest of the sweep.
                warn!(key = %key, error = %e, "failed to delete expired object");
                SWEEP_FAILURES_TOTAL.inc();
            }
        }
    }

    if deleted > 0 {
        SWEEP_DELETED_TOTAL.inc_by(deleted as u64);
        debug!(prefix = %prefix, deleted, "retention sweep finished");
    }

    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;
    use crate::testing::MemoryStore;

    #[test]
    fn test_parse_key_timestamp_valid() {
        assert_eq!(
            parse_key_timestamp("videos/", "videos/1714000000_My_Clip.mp4"),
            Some(1_714_000_000)
        );
    }

    #[test]
    fn test_parse_key_timestamp_rejects_malformed() {
        assert_eq!(parse_key_timestamp("videos/", "videos/no-stamp.mp4"), None);
        assert_eq!(parse_key_timestamp("videos/", "videos/abc_clip.mp4"), None);
        assert_eq!(parse_key_timestamp("videos/", "users/users.json"), None);
        assert_eq!(parse_key_timestamp("videos/", "videos/"), None);
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_expired() {
        let store = MemoryStore::new();
        let now = Utc::now().timestamp();
        let old_key = format!("videos/{}_old.mp4", now - 7200);
        let fresh_key = format!("videos/{}_fresh.mp4", now - 60);
        store.insert_object(&old_key, b"old".to_vec()).await;
        store.insert_object(&fresh_key, b"fresh".to_vec()).await;

        let deleted = sweep(&store, "videos/", 3600).await;

        assert_eq!(deleted, 1);
        assert!(!store.contains(&old_key).await);
        assert!(store.contains(&fresh_key).await);
    }

    #[tokio::test]
    async fn test_sweep_skips_malformed_keys() {
        let store = MemoryStore::new();
        store
            .insert_object("videos/not-a-timestamp.mp4", b"x".to_vec())
            .await;
        store.insert_object("videos/_leading.mp4", b"x".to_vec()).await;

        let deleted = sweep(&store, "videos/", 3600).await;

        assert_eq!(deleted, 0);
        assert!(store.contains("videos/not-a-timestamp.mp4").await);
        assert!(store.contains("videos/_leading.mp4").await);
    }

    #[tokio::test]
    async fn test_sweep_list_failure_is_absorbed() {
        let store = MemoryStore::new();
        store
            .set_list_error(StoreError::ListFailed("boom".into()))
            .await;

        let deleted = sweep(&store, "videos/", 3600).await;
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_sweep_continues_past_delete_failure() {
        let store = MemoryStore::new();
        let now = Utc::now().timestamp();
        let first = format!("videos/{}_a.mp4", now - 7200);
        let second = format!("videos/{}_b.mp4", now - 7200);
        store.insert_object(&first, b"a".to_vec()).await;
        store.insert_object(&second, b"b".to_vec()).await;
        // Only the first delete fails.
        store
            .set_delete_error(StoreError::DeleteFailed("transient".into()))
            .await;

        let deleted = sweep(&store, "videos/", 3600).await;
        assert_eq!(deleted, 1);
    }
}
