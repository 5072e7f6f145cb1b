//! The boundary to the regular-expression engine.
//!
//! [`Regex`](crate::Regex) never runs a pattern itself: it goes through an
//! [`Engine`]. [`DefaultEngine`] adapts the `regex` crate to the delimited,
//! modifier-suffixed pattern form produced by [`Builder`](crate::Builder).

use std::sync::RwLock;

use log::{debug, trace};
use regex::RegexBuilder;

use crate::CompileError;
use crate::match_data::Key;
use crate::util::DelimitedPattern;

/// The result of a global search, column-major: one column per capture key,
/// each holding `count` values (one per match, left to right).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureColumns {
    pub count: usize,
    pub columns: Vec<(Key, Vec<String>)>,
}

/// The Engine trait
///
/// One operation per search mode. Both receive the finalized pattern string
/// exactly as stored in the [`Regex`](crate::Regex), and must report a pattern
/// that does not compile as an error, never as a failed match.
pub trait Engine {
    /// Finds the first match. Returns its captures in emission order, with
    /// the whole match at key 0, or `None` if nothing matched.
    fn match_first(
        &self,
        pattern: &str,
        subject: &str,
    ) -> Result<Option<Vec<(Key, String)>>, CompileError>;

    /// Finds all non-overlapping matches.
    fn match_all(&self, pattern: &str, subject: &str) -> Result<CaptureColumns, CompileError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn match_first(
        &self,
        pattern: &str,
        subject: &str,
    ) -> Result<Option<Vec<(Key, String)>>, CompileError> {
        (**self).match_first(pattern, subject)
    }

    fn match_all(&self, pattern: &str, subject: &str) -> Result<CaptureColumns, CompileError> {
        (**self).match_all(pattern, subject)
    }
}

/// Engine options, as selected by the modifiers after the closing delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
    pub swap_greed: bool,
    pub anchored: bool,
    pub auto_capture: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            swap_greed: false,
            anchored: false,
            auto_capture: true,
        }
    }
}

impl Config {
    pub fn from_modifiers(modifiers: &str) -> Result<Self, CompileError> {
        let mut config = Config::default();
        for modifier in modifiers.chars() {
            match modifier {
                'i' => config.case_insensitive = true,
                'm' => config.multi_line = true,
                's' => config.dot_matches_new_line = true,
                'x' => config.ignore_whitespace = true,
                'U' => config.swap_greed = true,
                'A' => config.anchored = true,
                'n' => config.auto_capture = false,
                // `$` only matches at the very end unless `m` is set, and
                // matching is always Unicode-aware.
                'D' | 'u' | 'S' => {}
                '\n' | '\r' | ' ' => {}
                other => {
                    return Err(CompileError::new(format!("Unknown modifier '{other}'")));
                }
            }
        }
        Ok(config)
    }

    fn apply(&self, builder: &mut RegexBuilder) {
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .swap_greed(self.swap_greed);
    }
}

/// Rewrites the PCRE escapes the `regex` crate reads differently. `\<` and
/// `\>` are literals in PCRE but word boundaries in `regex`, and octal
/// escapes such as `\000` become `\x{..}`. With auto-capture disabled, plain
/// groups become non-capturing.
fn translate_body(body: &str, config: &Config) -> String {
    let mut translated = String::with_capacity(body.len() + 8);
    let mut chars = body.chars().peekable();
    let mut class_depth = 0usize;
    let mut class_start = false;

    while let Some(c) = chars.next() {
        let opens_class = c == '[';
        match c {
            '\\' => {
                let Some(escaped) = chars.next() else {
                    translated.push('\\');
                    break;
                };
                if escaped == '0' {
                    let mut value = 0u32;
                    for _ in 0..2 {
                        match chars.peek().and_then(|d| d.to_digit(8)) {
                            Some(digit) => {
                                value = value * 8 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    translated.push_str(&format!("\\x{{{value:X}}}"));
                } else if escaped.is_ascii_alphanumeric()
                    || regex_syntax::is_escapeable_character(escaped)
                {
                    translated.push('\\');
                    translated.push(escaped);
                } else {
                    translated.push(escaped);
                }
            }
            '[' => {
                class_depth += 1;
                translated.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    translated.push('^');
                }
            }
            ']' if class_depth > 0 && !class_start => {
                class_depth -= 1;
                translated.push(']');
            }
            '(' if !config.auto_capture && class_depth == 0 && chars.peek() != Some(&'?') => {
                translated.push_str("(?:");
            }
            other => translated.push(other),
        }
        class_start = opens_class;
    }

    if config.anchored {
        let tail = if config.ignore_whitespace { "\n)" } else { ")" };
        translated = format!("\\A(?:{translated}{tail}");
    }
    translated
}

/// Compiles a delimited pattern such as `~^foo$~i` into a `regex::Regex`.
pub fn compile_delimited(pattern: &str) -> Result<regex::Regex, CompileError> {
    let parsed = DelimitedPattern::parse(pattern)?;
    let config = Config::from_modifiers(parsed.modifiers)?;
    let translated = translate_body(parsed.body, &config);

    let mut builder = RegexBuilder::new(&translated);
    config.apply(&mut builder);
    let compiled = builder.build().map_err(|e| match e {
        regex::Error::Syntax(ref message) => {
            CompileError::new(format!("Regex parse error: {message}"))
        }
        regex::Error::CompiledTooBig(limit) => CompileError::new(format!(
            "Compile error: pattern exceeds the size limit of {limit} bytes"
        )),
        other => CompileError::new(format!("Compile error: {other}")),
    })?;

    debug!(
        "compiled {pattern:?} as {translated:?} with {} capture groups",
        compiled.captures_len() - 1
    );
    Ok(compiled)
}

/// Capture keys in PCRE emission order: a named group appears under its name,
/// then under its index.
fn capture_keys(compiled: &regex::Regex) -> Vec<(Key, usize)> {
    let mut keys = Vec::with_capacity(compiled.captures_len());
    for (index, name) in compiled.capture_names().enumerate() {
        if let Some(name) = name {
            keys.push((Key::Name(name.to_string()), index));
        }
        keys.push((Key::from(index), index));
    }
    keys
}

/// Reads a group's value. A group that took no part in the match reads as the
/// empty string.
fn group_value(captures: &regex::Captures<'_>, index: usize) -> String {
    captures
        .get(index)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Runs delimited patterns on the `regex` crate. The most recently compiled
/// pattern is kept, so matching the same pattern repeatedly compiles it once.
#[derive(Debug, Default)]
pub struct DefaultEngine {
    cache: RwLock<Option<(String, regex::Regex)>>,
}

impl DefaultEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn compiled(&self, pattern: &str) -> Result<regex::Regex, CompileError> {
        if let Ok(cache) = self.cache.read() {
            if let Some((cached, compiled)) = cache.as_ref() {
                if cached == pattern {
                    trace!("reusing compiled {pattern:?}");
                    return Ok(compiled.clone());
                }
            }
        }

        let compiled = compile_delimited(pattern)?;
        if let Ok(mut cache) = self.cache.write() {
            *cache = Some((pattern.to_string(), compiled.clone()));
        }
        Ok(compiled)
    }
}

impl Clone for DefaultEngine {
    fn clone(&self) -> Self {
        let cache = self.cache.read().ok().and_then(|cache| cache.clone());
        Self {
            cache: RwLock::new(cache),
        }
    }
}

impl Engine for DefaultEngine {
    fn match_first(
        &self,
        pattern: &str,
        subject: &str,
    ) -> Result<Option<Vec<(Key, String)>>, CompileError> {
        let compiled = self.compiled(pattern)?;
        let Some(captures) = compiled.captures(subject) else {
            trace!("{pattern:?} found no match");
            return Ok(None);
        };
        let values = capture_keys(&compiled)
            .into_iter()
            .map(|(key, index)| (key, group_value(&captures, index)))
            .collect();
        Ok(Some(values))
    }

    fn match_all(&self, pattern: &str, subject: &str) -> Result<CaptureColumns, CompileError> {
        let compiled = self.compiled(pattern)?;
        let keys = capture_keys(&compiled);
        let mut columns: Vec<(Key, Vec<String>)> = keys
            .iter()
            .map(|(key, _)| (key.clone(), Vec::new()))
            .collect();

        let mut count = 0;
        for captures in compiled.captures_iter(subject) {
            for ((_, index), (_, column)) in keys.iter().zip(columns.iter_mut()) {
                column.push(group_value(&captures, *index));
            }
            count += 1;
        }
        trace!("{pattern:?} found {count} matches");

        Ok(CaptureColumns { count, columns })
    }
}
