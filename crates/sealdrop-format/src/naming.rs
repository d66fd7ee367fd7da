//! Storage-facing filenames
//!
//! Every upload is stored under the current Unix time in milliseconds. The
//! generator never hands out the same name twice within a process: when two
//! uploads land in the same millisecond the later one is bumped forward.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Longest name accepted from a request path.
const MAX_NAME_LEN: usize = 20;

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Next strictly increasing storage name.
pub fn next_storage_name() -> String {
    let now = now_millis();
    let prev = LAST_ISSUED
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
            Some(now.max(prev + 1))
        })
        .unwrap_or_else(|prev| prev);
    now.max(prev + 1).to_string()
}

/// Names that could have come from [`next_storage_name`]: decimal digits only.
///
/// Anything else (path separators, dots, empty strings) is rejected before it
/// reaches the storage backend.
pub fn is_valid_storage_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_NAME_LEN && name.bytes().all(|b| b.is_ascii_digit())
}
