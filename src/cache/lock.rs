use std::sync::LockResult;

use tracing::warn;

/// Unwraps a std lock result, taking the guard back from a poisoned lock.
///
/// Cache entries are plain JSON values, so a writer that panicked mid-way
/// leaves at worst one stale entry behind.
pub(crate) fn recover<G>(result: LockResult<G>, op: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(
            target: "folio::cache",
            op,
            result = "poisoned_recovered",
            "recovered from poisoned cache lock"
        );
        poisoned.into_inner()
    })
}
