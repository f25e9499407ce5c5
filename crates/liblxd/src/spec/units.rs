//! Unit conversions between orchestrator and LXD value conventions. All
//! functions are total for well-typed input.

use std::collections::HashMap;

/// Memory in MB becomes an LXD size string, `2048` -> `"2048MB"`.
pub fn memory_limit(memory_mb: u64) -> String {
    format!("{memory_mb}MB")
}

/// Fractional CPU share becomes an allowance percentage, `0.5` -> `"50%"`.
pub fn cpu_allowance(share: f64) -> String {
    format!("{}%", (share * 100.0).round() as i64)
}

/// NIC bandwidth in bytes/sec becomes an LXD bit-rate string, `1000` ->
/// `"8000kbit"`. The value is multiplied by 8 only; the `kbit` suffix is
/// applied without a further /1000. Known unit conflation, but consumers
/// expect exactly this string.
pub fn nic_bandwidth(bytes_per_sec: u64) -> String {
    format!("{}kbit", bytes_per_sec * 8)
}

/// Inserts only the supplied values under their destination keys. Absent
/// sources produce no key at all, never a zero placeholder.
pub fn extend_present(map: &mut HashMap<String, String>, entries: &[(&str, Option<String>)]) {
    for (key, value) in entries {
        if let Some(value) = value {
            map.insert((*key).to_owned(), value.clone());
        }
    }
}
