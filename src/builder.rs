//! A fluent builder for delimited regex strings.
//!
//! ```
//! use reggie::Builder;
//!
//! let mut builder = Builder::new();
//! let alternatives = builder.list_of_alternatives(&["vendor", "var", "node_modules"], true);
//! let regex = builder
//!     .anchor_start(true)
//!     .add_literal("/path/to/project/")
//!     .add_subpattern(&alternatives, true)
//!     .add_literal("/")
//!     .build_string();
//!
//! assert_eq!(regex, "~^/path/to/project/(vendor|var|node_modules)/~");
//! ```

use std::fmt;

use crate::regex::Regex;
use crate::util::{self, closing_delimiter};

/// The case-insensitive flag.
const CASE_INSENSITIVE: char = 'i';
/// Flag character that anchors the pattern at the start when passed to
/// [`Builder::set_flags`].
const ANCHOR_START: char = 'A';
/// Flag character that anchors the pattern at the end when passed to
/// [`Builder::set_flags`].
const ANCHOR_END: char = 'Z';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    delimiter: char,
    flags: String,
    anchor_start: bool,
    anchor_end: bool,
    chunks: Vec<String>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            delimiter: '~',
            flags: String::new(),
            anchor_start: false,
            anchor_end: false,
            chunks: Vec::new(),
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delimiter wrapping the pattern. `(`, `[`, `{` and `<` close
    /// with their matching bracket.
    pub fn delimiter(&mut self, delimiter: char) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn get_delimiter(&self) -> char {
        self.delimiter
    }

    /// Replaces all flags, anchors included. `A` and `Z` are not kept as
    /// flags: they set the start and end anchors instead.
    pub fn set_flags(&mut self, flags: &str) -> &mut Self {
        self.flags.clear();
        self.anchor_start = false;
        self.anchor_end = false;
        for flag in flags.chars() {
            match flag {
                ANCHOR_START => self.anchor_start = true,
                ANCHOR_END => self.anchor_end = true,
                other => self.flags.push(other),
            }
        }
        self
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn case_sensitive(&mut self, yes: bool) -> &mut Self {
        self.toggle_flag(CASE_INSENSITIVE, !yes);
        self
    }

    pub fn case_insensitive(&mut self, yes: bool) -> &mut Self {
        self.case_sensitive(!yes)
    }

    /// Anchors the pattern at the start (e.g. `~^Start~`).
    pub fn anchor_start(&mut self, yes: bool) -> &mut Self {
        self.anchor_start = yes;
        self
    }

    /// Anchors the pattern at the end (e.g. `~End$~`).
    pub fn anchor_end(&mut self, yes: bool) -> &mut Self {
        self.anchor_end = yes;
        self
    }

    /// Anchors the pattern on both sides (e.g. `~^Both$~`).
    pub fn anchor_both(&mut self, yes: bool) -> &mut Self {
        self.anchor_start(yes).anchor_end(yes)
    }

    /// Escapes special regex characters, and the delimiter.
    pub fn quote(&self, input: &str) -> String {
        util::quote(input, self.delimiter)
    }

    /// A quoted backslash, because literal backslashes in regex strings are
    /// bewildering.
    pub fn backslash(&self) -> String {
        self.quote("\\")
    }

    /// See [`Builder::backslash`].
    pub fn slosh(&self) -> String {
        self.backslash()
    }

    /// Joins the patterns into a list of alternatives (e.g. `foo|bar`),
    /// without grouping them.
    pub fn list_of_alternatives<S: AsRef<str>>(&self, patterns: &[S], quote_each: bool) -> String {
        patterns
            .iter()
            .map(|pattern| {
                if quote_each {
                    self.quote(pattern.as_ref())
                } else {
                    pattern.as_ref().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Adds a chunk, anything at all, to the pattern.
    pub fn add(&mut self, fragment: &str, quote: bool) -> &mut Self {
        let chunk = if quote {
            self.quote(fragment)
        } else {
            fragment.to_string()
        };
        self.chunks.push(chunk);
        self
    }

    /// Adds text that is matched literally.
    pub fn add_literal(&mut self, text: &str) -> &mut Self {
        self.add(text, true)
    }

    /// Adds a subpattern, `(foo)` or `(?:foo)`.
    pub fn add_subpattern(&mut self, pattern: &str, capturing: bool) -> &mut Self {
        let subpattern = subpattern(pattern, capturing);
        self.add(&subpattern, false)
    }

    /// Adds a named subpattern, `(?<name>foo)`.
    pub fn add_named_subpattern(&mut self, name: &str, pattern: &str) -> &mut Self {
        let subpattern = format!("(?<{name}>{pattern})");
        self.add(&subpattern, false)
    }

    /// Adds a whole word, `\bfoo\b` or `\b(foo)\b`.
    pub fn add_whole_word(&mut self, word: &str, capture_word: bool) -> &mut Self {
        let word = if capture_word {
            subpattern(word, true)
        } else {
            word.to_string()
        };
        self.add(&format!("\\b{word}\\b"), false)
    }

    /// Builds the regex string: the chunks, anchored if requested, wrapped in
    /// the delimiter and followed by the flags.
    pub fn build_string(&self) -> String {
        let mut regex = String::new();
        regex.push(self.delimiter);
        if self.anchor_start {
            regex.push('^');
        }
        for chunk in &self.chunks {
            regex.push_str(chunk);
        }
        if self.anchor_end {
            regex.push('$');
        }
        regex.push(closing_delimiter(self.delimiter));
        regex.push_str(&self.flags);
        regex
    }

    pub fn build(&self) -> Regex {
        Regex::new(self.build_string())
    }

    /// Adds the flag if absent, or removes it if present.
    fn toggle_flag(&mut self, flag: char, on: bool) {
        let present = self.flags.contains(flag);
        if on && !present {
            self.flags.push(flag);
        } else if !on && present {
            self.flags.retain(|c| c != flag);
        }
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build_string())
    }
}

fn subpattern(pattern: &str, capturing: bool) -> String {
    if capturing {
        format!("({pattern})")
    } else {
        format!("(?:{pattern})")
    }
}
