use serde::ser::{Serialize, SerializeMap, Serializer};

/// Occurrence counts keyed by a category's string value.
///
/// Keys appear in the order they were first seen and only keys that were
/// actually observed are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCounts {
    entries: Vec<(String, usize)>,
}

impl GroupCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    /// Count for `key`, or 0 if it was never seen
    pub fn get(&self, key: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, count)| (k.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest single count, used to scale bars
    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }
}

impl Serialize for GroupCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_in_first_seen_order() {
        let mut groups = GroupCounts::new();
        for key in ["referral", "website", "referral", "other", "website", "referral"] {
            groups.increment(key);
        }
        let entries: Vec<_> = groups.iter().collect();
        assert_eq!(entries, vec![("referral", 3), ("website", 2), ("other", 1)]);
        assert_eq!(groups.max_count(), 3);
    }

    #[test]
    fn test_absent_key_reads_zero() {
        let mut groups = GroupCounts::new();
        groups.increment("low");
        assert_eq!(groups.get("low"), 1);
        assert_eq!(groups.get("enterprise"), 0);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_empty() {
        let groups = GroupCounts::new();
        assert!(groups.is_empty());
        assert_eq!(groups.max_count(), 0);
        assert_eq!(serde_json::to_string(&groups).unwrap(), "{}");
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let mut groups = GroupCounts::new();
        groups.increment("mobile-app");
        groups.increment("ecommerce");
        groups.increment("mobile-app");
        assert_eq!(
            serde_json::to_string(&groups).unwrap(),
            r#"{"mobile-app":2,"ecommerce":1}"#
        );
    }
}
