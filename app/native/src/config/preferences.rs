//! Flat key/value preference snapshot.
//!
//! A [`Preferences`] value is whatever the store currently holds. Readers never
//! fail: an absent or wrongly typed key yields the caller's fallback.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable-by-convention snapshot of the configuration store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(Map<String, Value>);

impl From<Map<String, Value>> for Preferences {
    fn from(map: Map<String, Value>) -> Self { Self(map) }
}

impl Preferences {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Builds a snapshot from a JSON value. Non-object values produce an empty snapshot.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> { self.0.remove(key) }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.0.iter() }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> { &self.0 }

    /// Returns the value as a string slice, if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> { self.0.get(key).and_then(Value::as_str) }

    /// Reads a string, falling back when absent or not a string.
    #[must_use]
    pub fn string(&self, key: &str, fallback: &str) -> String {
        self.get_str(key).unwrap_or(fallback).to_string()
    }

    /// Reads a boolean, falling back when absent or not a boolean.
    #[must_use]
    pub fn bool(&self, key: &str, fallback: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(fallback)
    }

    /// Reads an integer. Integral floats such as `50.0` are accepted.
    #[must_use]
    pub fn int(&self, key: &str, fallback: i64) -> i64 { self.opt_i64(key).unwrap_or(fallback) }

    /// Reads a finite float, falling back when absent, non-numeric or non-finite.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn float(&self, key: &str, fallback: f32) -> f32 {
        self.0
            .get(key)
            .and_then(Value::as_f64)
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .unwrap_or(fallback)
    }

    /// Reads an integer that fits in `i32`.
    #[must_use]
    pub fn opt_i32(&self, key: &str) -> Option<i32> {
        self.opt_i64(key).and_then(|v| i32::try_from(v).ok())
    }

    /// Reads an hour of day (0-23).
    #[must_use]
    pub fn opt_hour(&self, key: &str) -> Option<u32> {
        self.opt_i64(key).and_then(|v| u32::try_from(v).ok()).filter(|h| *h < 24)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn opt_i64(&self, key: &str) -> Option<i64> {
        let value = self.0.get(key)?;
        if let Some(v) = value.as_i64() {
            return Some(v);
        }
        value
            .as_f64()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .filter(|v| v.abs() < 9.0e15)
            .map(|v| v as i64)
    }

    /// Keys whose value differs between `self` and `other`, including keys
    /// present in only one of them. Sorted for stable output.
    #[must_use]
    pub fn changed_keys(&self, other: &Self) -> Vec<String> {
        let mut changed: Vec<String> = self
            .0
            .iter()
            .filter(|(key, value)| other.0.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .chain(other.0.keys().filter(|key| !self.0.contains_key(*key)).cloned())
            .collect();
        changed.sort();
        changed
    }

    /// Applies `updates` on top of this snapshot and returns the keys that changed.
    pub fn merge(&mut self, updates: &Self) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, value) in &updates.0 {
            if self.0.get(key) != Some(value) {
                self.0.insert(key.clone(), value.clone());
                changed.push(key.clone());
            }
        }
        changed.sort();
        changed
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn prefs(value: Value) -> Preferences { Preferences::from_value(value) }

    #[test]
    fn test_string_fallback_on_wrong_type() {
        let p = prefs(json!({ "a": "x", "b": 3 }));
        assert_eq!(p.string("a", "d"), "x");
        assert_eq!(p.string("b", "d"), "d");
        assert_eq!(p.string("missing", "d"), "d");
    }

    #[test]
    fn test_bool_fallback_on_wrong_type() {
        let p = prefs(json!({ "a": true, "b": "true" }));
        assert!(p.bool("a", false));
        assert!(!p.bool("b", false));
    }

    #[test]
    fn test_int_accepts_integral_floats() {
        let p = prefs(json!({ "a": 50, "b": 25.0, "c": 25.5, "d": "7" }));
        assert_eq!(p.int("a", 0), 50);
        assert_eq!(p.int("b", 0), 25);
        assert_eq!(p.int("c", -1), -1);
        assert_eq!(p.int("d", -1), -1);
    }

    #[test]
    fn test_float_reads_integers_and_floats() {
        let p = prefs(json!({ "a": 2, "b": 1.5, "c": null }));
        assert!((p.float("a", 0.0) - 2.0).abs() < f32::EPSILON);
        assert!((p.float("b", 0.0) - 1.5).abs() < f32::EPSILON);
        assert!((p.float("c", 9.0) - 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_opt_i32_range() {
        let p = prefs(json!({ "a": 12, "b": 10_000_000_000_i64 }));
        assert_eq!(p.opt_i32("a"), Some(12));
        assert_eq!(p.opt_i32("b"), None);
    }

    #[test]
    fn test_opt_hour_range() {
        let p = prefs(json!({ "a": 23, "b": 24, "c": -1 }));
        assert_eq!(p.opt_hour("a"), Some(23));
        assert_eq!(p.opt_hour("b"), None);
        assert_eq!(p.opt_hour("c"), None);
    }

    #[test]
    fn test_changed_keys_covers_both_sides() {
        let old = prefs(json!({ "a": 1, "b": 2, "c": 3 }));
        let new = prefs(json!({ "a": 1, "b": 5, "d": 4 }));
        assert_eq!(new.changed_keys(&old), vec!["b", "c", "d"]);
        assert!(old.changed_keys(&old).is_empty());
    }

    #[test]
    fn test_merge_reports_only_real_changes() {
        let mut p = prefs(json!({ "a": 1, "b": 2 }));
        let changed = p.merge(&prefs(json!({ "a": 1, "b": 3, "c": 4 })));
        assert_eq!(changed, vec!["b", "c"]);
        assert_eq!(p.int("b", 0), 3);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_from_non_object_is_empty() {
        assert!(Preferences::from_value(json!([1, 2])).is_empty());
    }
}
