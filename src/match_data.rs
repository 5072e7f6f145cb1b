//! Captures of a single match, addressable by position or by group name.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// A capture key: the position of a group, or its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(i64::from(index))
    }
}

/// Positions past `i64::MAX` saturate; no engine emits that many groups.
impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Parses a key typed as text: an integer becomes an index, an identifier
/// becomes a group name. Anything else is rejected.
impl FromStr for Key {
    type Err = MatchDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<i64>() {
            return Ok(Key::Index(index));
        }
        let mut chars = s.chars();
        let valid_name = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if valid_name {
            Ok(Key::Name(s.to_string()))
        } else {
            Err(MatchDataError::InvalidKey(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDataError {
    /// The key is neither an integer nor a group name.
    InvalidKey(String),
    /// Nothing was captured under the key.
    MissingKey(Key),
}

impl fmt::Display for MatchDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchDataError::InvalidKey(raw) => write!(f, "The key is invalid: {raw:?}"),
            MatchDataError::MissingKey(key) => write!(f, "No capture for key {key}"),
        }
    }
}

impl core::error::Error for MatchDataError {}

/// Captured values of one match, in the order the engine emitted them:
/// the whole match at key 0, then each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchData {
    matches: Vec<(Key, String)>,
}

impl MatchData {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing mapping, in insertion order.
    pub fn to_map(&self) -> &[(Key, String)] {
        &self.matches
    }

    pub fn get(&self, key: impl Into<Key>) -> Result<&str, MatchDataError> {
        let key = key.into();
        self.position(&key)
            .map(|pos| self.matches[pos].1.as_str())
            .ok_or(MatchDataError::MissingKey(key))
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.position(&key.into()).is_some()
    }

    /// Writes a capture. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(pos) => self.matches[pos].1 = value,
            None => self.matches.push((key, value)),
        }
    }

    /// Removes a capture, returning it if it was present.
    pub fn unset(&mut self, key: impl Into<Key>) -> Option<String> {
        let pos = self.position(&key.into())?;
        Some(self.matches.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &str)> {
        self.matches.iter().map(|(key, value)| (key, value.as_str()))
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.matches.iter().position(|(k, _)| k == key)
    }
}

impl<K: Into<Key>, V: Into<String>> FromIterator<(K, V)> for MatchData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut match_data = MatchData::new();
        for (key, value) in iter {
            match_data.set(key, value);
        }
        match_data
    }
}

impl From<Vec<(Key, String)>> for MatchData {
    fn from(matches: Vec<(Key, String)>) -> Self {
        matches.into_iter().collect()
    }
}

/// Positional captures, as from a pattern without named groups.
impl From<Vec<&str>> for MatchData {
    fn from(values: Vec<&str>) -> Self {
        values.into_iter().enumerate().collect()
    }
}

impl Index<usize> for MatchData {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Index<&str> for MatchData {
    type Output = str;

    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}
