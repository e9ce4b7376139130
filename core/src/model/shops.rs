use serde::{Deserialize, Serialize};

pub const DEFAULT_SHOPS: [&str; 5] = ["50嵐", "一沐日", "五桐號", "迷客夏", "珍煮丹"];

/// Known shop names in the order they were first seen.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ShopRegistry {
    names: Vec<String>,
}

impl ShopRegistry {
    pub fn seeded() -> Self {
        Self {
            names: DEFAULT_SHOPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Keeps the first occurrence of every name from a persisted list.
    pub fn from_saved(saved: Vec<String>) -> Self {
        let mut registry = Self { names: Vec::with_capacity(saved.len()) };
        for name in saved {
            registry.register(&name);
        }
        registry
    }

    /// Appends `name` unless it is already known (exact match).
    /// Returns whether the registry grew.
    pub fn register(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ShopRegistry {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_appends_unseen_name_once() {
        let mut registry = ShopRegistry::seeded();
        let before = registry.names().to_vec();

        assert!(registry.register("可不可"));
        assert!(!registry.register("可不可"));

        assert_eq!(registry.len(), before.len() + 1);
        assert_eq!(&registry.names()[..before.len()], before.as_slice());
        assert_eq!(registry.names().last().map(String::as_str), Some("可不可"));
    }

    #[test]
    fn test_register_is_case_sensitive() {
        let mut registry = ShopRegistry::from_saved(vec!["Tea".to_string()]);
        assert!(registry.register("tea"));
        assert_eq!(registry.names(), ["Tea".to_string(), "tea".to_string()]);
    }

    #[test]
    fn test_saved_empty_list_stays_empty() {
        assert!(ShopRegistry::from_saved(Vec::new()).is_empty());
        assert!(!ShopRegistry::seeded().is_empty());
    }

    #[test]
    fn test_from_saved_drops_duplicates() {
        let registry = ShopRegistry::from_saved(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(registry.names(), ["A".to_string(), "B".to_string()]);
    }
}
