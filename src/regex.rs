//! Types and API for Regex matching
//!
//! This module defines the [`Regex`] struct, a wrapper around a finalized
//! pattern string that runs on one of the available [`Engine`]s and turns
//! its raw captures into [`MatchData`].

use std::fmt;

use crate::CompileError;
use crate::engine::{DefaultEngine, Engine};
use crate::match_data::MatchData;

/// A finalized regular expression, e.g. `~^foo$~i`.
///
/// The pattern is stored verbatim. It is only compiled when a search runs, so
/// a malformed pattern surfaces as a [`CompileError`] from the search methods.
#[derive(Debug, Clone)]
pub struct Regex<E: Engine = DefaultEngine> {
    pattern: String,
    engine: E,
}

/// The result of [`Regex::matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matched {
    Single(MatchData),
    Global(Vec<MatchData>),
}

impl Regex {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self::with_engine(pattern, DefaultEngine::new())
    }
}

impl<E: Engine> Regex<E> {
    /// Wraps a pattern that will run on the given engine.
    pub fn with_engine(pattern: impl Into<String>, engine: E) -> Self {
        Self {
            pattern: pattern.into(),
            engine,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Matches the regex against the subject and returns the captures of the
    /// first match, or None.
    pub fn find(&self, subject: &str) -> Result<Option<MatchData>, CompileError> {
        let captures = self.engine.match_first(&self.pattern, subject)?;
        Ok(captures.map(MatchData::from))
    }

    /// Performs a global search: returns one [`MatchData`] per non-overlapping
    /// match, in the order they occur in the subject, or None if there is no
    /// match at all.
    pub fn find_all(&self, subject: &str) -> Result<Option<Vec<MatchData>>, CompileError> {
        let found = self.engine.match_all(&self.pattern, subject)?;
        if found.count == 0 {
            return Ok(None);
        }

        let mut all = vec![MatchData::new(); found.count];
        for (key, column) in &found.columns {
            for (match_data, value) in all.iter_mut().zip(column) {
                match_data.set(key, value.as_str());
            }
        }
        Ok(Some(all))
    }

    /// Runs [`Regex::find_all`] when `global` is set, [`Regex::find`]
    /// otherwise.
    pub fn matches(&self, subject: &str, global: bool) -> Result<Option<Matched>, CompileError> {
        if global {
            Ok(self.find_all(subject)?.map(Matched::Global))
        } else {
            Ok(self.find(subject)?.map(Matched::Single))
        }
    }

    /// Returns true iff the regex matches somewhere in the subject.
    pub fn test(&self, subject: &str) -> Result<bool, CompileError> {
        Ok(self.find(subject)?.is_some())
    }
}

impl<E: Engine> fmt::Display for Regex<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl<E: Engine> AsRef<str> for Regex<E> {
    fn as_ref(&self) -> &str {
        &self.pattern
    }
}

impl From<&str> for Regex {
    fn from(pattern: &str) -> Self {
        Regex::new(pattern)
    }
}

impl From<String> for Regex {
    fn from(pattern: String) -> Self {
        Regex::new(pattern)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::CaptureColumns;
    use crate::match_data::Key;
    use pretty_assertions::assert_eq;

    /// Replays canned engine output and records every call.
    #[derive(Default)]
    struct FakeEngine {
        first: Option<Vec<(Key, String)>>,
        all: CaptureColumns,
        calls: RefCell<Vec<(&'static str, String, String)>>,
    }

    impl Engine for FakeEngine {
        fn match_first(
            &self,
            pattern: &str,
            subject: &str,
        ) -> Result<Option<Vec<(Key, String)>>, CompileError> {
            self.calls
                .borrow_mut()
                .push(("first", pattern.to_string(), subject.to_string()));
            Ok(self.first.clone())
        }

        fn match_all(&self, pattern: &str, subject: &str) -> Result<CaptureColumns, CompileError> {
            self.calls
                .borrow_mut()
                .push(("all", pattern.to_string(), subject.to_string()));
            Ok(self.all.clone())
        }
    }

    struct BrokenEngine;

    impl Engine for BrokenEngine {
        fn match_first(
            &self,
            _pattern: &str,
            _subject: &str,
        ) -> Result<Option<Vec<(Key, String)>>, CompileError> {
            Err(CompileError::new("broken"))
        }

        fn match_all(&self, _pattern: &str, _subject: &str) -> Result<CaptureColumns, CompileError> {
            Err(CompileError::new("broken"))
        }
    }

    fn column(key: i64, values: &[&str]) -> (Key, Vec<String>) {
        (
            Key::Index(key),
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    #[test]
    fn test_to_string_returns_pattern() {
        for pattern in ["~~", "~^Foo$~"] {
            let regex = Regex::new(pattern);
            assert_eq!(regex.to_string(), pattern);
            assert_eq!(regex.as_str(), pattern);
        }
    }

    #[test]
    fn test_test() {
        let regex = Regex::new("~foo~");
        assert_eq!(regex.test("foo"), Ok(true));
        assert_eq!(regex.test("bar"), Ok(false));
    }

    #[test]
    fn test_find() {
        let regex = Regex::new("~://(.*?)(/|$)~");
        assert_eq!(
            regex.find("https://example.com").unwrap(),
            Some(MatchData::from(vec!["://example.com", "example.com", ""]))
        );
        assert_eq!(regex.find("foo").unwrap(), None);
    }

    #[test]
    fn test_find_calls_engine() {
        let engine = FakeEngine {
            first: Some(
                MatchData::from(vec!["://example.com", "example.com", ""])
                    .to_map()
                    .to_vec(),
            ),
            ..Default::default()
        };
        let regex = Regex::with_engine("~://(.*?)(/|$)~", &engine);

        assert_eq!(
            regex.find("https://example.com").unwrap(),
            Some(MatchData::from(vec!["://example.com", "example.com", ""]))
        );
        assert_eq!(
            *engine.calls.borrow(),
            vec![(
                "first",
                "~://(.*?)(/|$)~".to_string(),
                "https://example.com".to_string()
            )]
        );
    }

    #[test]
    fn test_find_all() {
        let regex = Regex::new("~[?&]([a-z]+)=([a-z]+)~");
        assert_eq!(
            regex.find_all("https://example.com?foo=bar&baz=qux").unwrap(),
            Some(vec![
                MatchData::from(vec!["?foo=bar", "foo", "bar"]),
                MatchData::from(vec!["&baz=qux", "baz", "qux"]),
            ])
        );
        assert_eq!(regex.find_all("https://example.com").unwrap(), None);
    }

    #[test]
    fn test_find_all_transposes_engine_columns() {
        let engine = FakeEngine {
            all: CaptureColumns {
                count: 2,
                columns: vec![
                    column(0, &["?foo=bar", "&baz=qux"]),
                    column(1, &["foo", "baz"]),
                    column(2, &["bar", "qux"]),
                ],
            },
            ..Default::default()
        };
        let regex = Regex::with_engine("~[?&]([a-z]+)=([a-z]+)~", &engine);

        assert_eq!(
            regex
                .matches("https://example.com?foo=bar&baz=qux", true)
                .unwrap(),
            Some(Matched::Global(vec![
                MatchData::from(vec!["?foo=bar", "foo", "bar"]),
                MatchData::from(vec!["&baz=qux", "baz", "qux"]),
            ]))
        );
        assert_eq!(engine.calls.borrow().len(), 1);
        assert_eq!(engine.calls.borrow()[0].0, "all");
    }

    #[test]
    fn test_find_all_keeps_named_columns() {
        let engine = FakeEngine {
            all: CaptureColumns {
                count: 1,
                columns: vec![
                    column(0, &["k=v"]),
                    (Key::from("name"), vec!["k".to_string()]),
                    column(1, &["k"]),
                ],
            },
            ..Default::default()
        };
        let regex = Regex::with_engine("~(?<name>\\w)=\\w~", &engine);
        let found = regex.find_all("k=v").unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("name"), Ok("k"));
        assert_eq!(found[0].get(1), Ok("k"));
    }

    #[test]
    fn test_zero_matches_is_absent() {
        let engine = FakeEngine::default();
        let regex = Regex::with_engine("~x~", &engine);
        assert_eq!(regex.matches("y", true).unwrap(), None);
        assert_eq!(regex.matches("y", false).unwrap(), None);
        assert_eq!(regex.test("y"), Ok(false));
    }

    #[test]
    fn test_compile_error_is_not_a_failed_match() {
        let regex = Regex::with_engine("~x~", BrokenEngine);
        assert_eq!(regex.find("x"), Err(CompileError::new("broken")));
        assert_eq!(regex.find_all("x"), Err(CompileError::new("broken")));
        assert_eq!(regex.test("x"), Err(CompileError::new("broken")));

        let regex = Regex::new("~(unclosed~");
        assert!(regex.test("unclosed").is_err());
        assert!(regex.find_all("unclosed").is_err());
    }
}
