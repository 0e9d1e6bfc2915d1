//! Property tests for release directory names.

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use releasectl::domain::value_objects::{natural_cmp, RevisionId};

/// Up to the year 2100, in microseconds
const MAX_MICROS: i64 = 4_102_444_800_000_000;

fn at(micros: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_micros(micros).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: String order of ids is chronological order.
    #[test]
    fn property_id_order_matches_time_order(a in 0..MAX_MICROS, b in 0..MAX_MICROS) {
        let left = RevisionId::from_datetime(at(a));
        let right = RevisionId::from_datetime(at(b));

        prop_assert_eq!(left.as_str().cmp(right.as_str()), a.cmp(&b));
        prop_assert_eq!(natural_cmp(left.as_str(), right.as_str()), a.cmp(&b));
        prop_assert_eq!(left.as_str().len(), right.as_str().len());
    }

    /// PROPERTY: Ids generated in one process strictly increase.
    #[test]
    fn property_generated_ids_strictly_increase(count in 2usize..64) {
        let ids: Vec<RevisionId> = (0..count).map(|_| RevisionId::generate()).collect();
        for pair in ids.windows(2) {
            prop_assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }
}
