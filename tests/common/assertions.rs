//! Assertion helpers for JSON reports

#![allow(dead_code)]

use serde_json::Value;

/// Parse command stdout as JSON, panicking with the raw text on failure
pub fn parse_json(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid JSON ({}):\n{}", e, text))
}

/// Find the entry for `file_key` in a comparison report
pub fn entry<'a>(report: &'a Value, file_key: &str) -> &'a Value {
    report["entries"]
        .as_array()
        .and_then(|entries| entries.iter().find(|e| e["file_key"] == file_key))
        .unwrap_or_else(|| panic!("no entry for {} in {}", file_key, report))
}

/// Assert two percentages are within `epsilon`
pub fn assert_percent_within(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() <= epsilon,
        "percent {} not within {} of {}",
        actual,
        epsilon,
        expected
    );
}
