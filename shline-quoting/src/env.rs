//! Ordered environment modifications.
//!
//! The assembled command line lists variables in the order they were
//! inserted, so the container is an [`IndexMap`] rather than a hash map.

use indexmap::IndexMap;

/// Value half of an environment entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// Assign the variable, possibly to the empty string.
    Set(String),
    /// Remove the variable from the environment.
    Unset,
}

impl EnvValue {
    pub fn as_set(&self) -> Option<&str> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }
}

impl From<Option<String>> for EnvValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        Self::Set(value)
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        Self::Set(value.to_string())
    }
}

/// Insertion-ordered set of environment assignments and removals.
///
/// Re-inserting a name replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvChanges {
    entries: IndexMap<String, EnvValue>,
}

impl EnvChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `name`, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<EnvValue>,
    ) -> Option<EnvValue> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, EnvValue::Set(value.into()));
        self
    }

    pub fn unset(mut self, name: impl Into<String>) -> Self {
        self.insert(name, EnvValue::Unset);
        self
    }

    pub fn get(&self, name: &str) -> Option<&EnvValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvChanges
where
    K: Into<String>,
    V: Into<EnvValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut changes = Self::new();
        changes.extend(iter);
        changes
    }
}

impl<K, V> Extend<(K, V)> for EnvChanges
where
    K: Into<String>,
    V: Into<EnvValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Whether `name` belongs to the portable identifier class
/// `[A-Za-z_][A-Za-z0-9_]*` accepted by every supported dialect.
pub fn is_portable_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
