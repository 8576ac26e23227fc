// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::hash::Hash;

/// Independent copy of `m`; changing the copy's entries never affects `m`
pub fn copy_map<K, V>(m: &HashMap<K, V>) -> HashMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    let mut copy = HashMap::with_capacity(m.len());
    for (k, v) in m {
        copy.insert(k.clone(), v.clone());
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_has_same_entries() {
        let mut original = HashMap::new();
        original.insert("age".to_string(), "ageOnEarth".to_string());
        original.insert("name".to_string(), "fullName".to_string());

        assert_eq!(copy_map(&original), original);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = HashMap::new();
        original.insert("age".to_string(), "ageOnEarth".to_string());

        let mut copy = copy_map(&original);
        copy.insert("extra".to_string(), "x".to_string());
        copy.remove("age");
        copy.insert("name".to_string(), "changed".to_string());

        assert_eq!(original.len(), 1);
        assert_eq!(original.get("age").map(String::as_str), Some("ageOnEarth"));
        assert!(!original.contains_key("extra"));
    }

    #[test]
    fn test_copy_of_empty_map() {
        let original: HashMap<String, String> = HashMap::new();
        assert!(copy_map(&original).is_empty());
    }
}
