//! Property tests for release retention.

use std::fs;

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use tempfile::TempDir;

use releasectl::domain::value_objects::RevisionId;
use releasectl::infrastructure::ReleaseStore;

/// A base dir holding `count` releases one minute apart, oldest first
fn releases(count: usize) -> (TempDir, ReleaseStore, Vec<std::path::PathBuf>) {
    let dir = TempDir::new().unwrap();
    let store = ReleaseStore::new(dir.path(), "current");
    let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    let paths = (0..count)
        .map(|n| {
            let at = start + chrono::Duration::minutes(n as i64);
            let path = store.new_release_dir(&RevisionId::from_datetime(at));
            fs::create_dir_all(&path).unwrap();
            path
        })
        .collect();
    (dir, store, paths)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: After pruning around the live release, at most K + 1
    /// releases remain and the live one is among them.
    #[test]
    fn property_prune_keeps_at_most_retention_plus_live(
        count in 1usize..12,
        live_offset in 0usize..12,
        retain in 1usize..5,
    ) {
        let (_dir, store, paths) = releases(count);
        let live = &paths[live_offset % count];
        store.swap_symlink(live).unwrap();

        store.prune(live, retain).unwrap();

        let remaining = store.releases();
        prop_assert!(remaining.len() <= retain + 1, "{} > {}", remaining.len(), retain + 1);
        prop_assert!(remaining.contains(live));
        let resolved = store.resolved_current_release_dir();
        prop_assert_eq!(resolved.as_ref(), Some(live));
        for release in &remaining {
            prop_assert!(release <= live, "{} is newer than live", release.display());
        }
    }

    /// PROPERTY: Retention 0 never deletes anything.
    #[test]
    fn property_zero_retention_keeps_everything(count in 1usize..10) {
        let (_dir, store, paths) = releases(count);
        let newest = paths.last().unwrap();
        store.swap_symlink(newest).unwrap();

        prop_assert!(store.prune(newest, 0).unwrap().is_empty());
        prop_assert_eq!(store.releases(), paths);
    }
}
