use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("'{0}' is already registered")]
    Duplicate(String),
    #[error("'{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Ordered name → entry map with case-insensitive lookup.
///
/// Names are stored as registered; two names that differ only in ASCII case
/// are rejected as duplicates.
pub struct Registry<T: ?Sized> {
    entries: Vec<(String, Arc<T>)>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, entry: Arc<T>) -> Result<(), RegistryError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if let Some((existing, _)) = self.resolve(name) {
            return Err(RegistryError::Duplicate(existing.to_string()));
        }
        self.entries.push((name.to_string(), entry));
        Ok(())
    }

    /// Looks up `name` ignoring ASCII case; returns the canonical name too.
    pub fn resolve(&self, name: &str) -> Option<(&str, &Arc<T>)> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.resolve(name).map(|(_, entry)| entry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_keeps_canonical_name() {
        let mut registry: Registry<str> = Registry::new();
        registry.register("Navigator", Arc::from("nav")).unwrap();

        let (name, entry) = registry.resolve("NAVIGATOR").unwrap();
        assert_eq!(name, "Navigator");
        assert_eq!(&**entry, "nav");
        assert!(registry.get(" navigator ").is_some());
        assert!(registry.get("pilot").is_none());
    }

    #[test]
    fn rejects_empty_and_case_colliding_names() {
        let mut registry: Registry<str> = Registry::new();
        registry.register("code_expert", Arc::from("a")).unwrap();

        assert_eq!(
            registry.register("CODE_EXPERT", Arc::from("b")),
            Err(RegistryError::Duplicate("code_expert".to_string()))
        );
        assert_eq!(
            registry.register("   ", Arc::from("c")),
            Err(RegistryError::EmptyName)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_preserve_registration_order() {
        let mut registry: Registry<str> = Registry::new();
        for name in ["pilot", "engineer", "medic"] {
            registry.register(name, Arc::from(name)).unwrap();
        }
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["pilot", "engineer", "medic"]
        );
    }
}
