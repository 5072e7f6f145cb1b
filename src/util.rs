/*!
Helpers shared by the builder and the default engine: delimiter handling,
quoting, and splitting a finalized pattern string back into its parts.
*/

use crate::CompileError;

/// Characters escaped by [`quote`], independent of the delimiter.
pub const SPECIAL_CHARS: &[char] = &[
    '.', '\\', '+', '*', '?', '[', '^', ']', '$', '(', ')', '{', '}', '=', '!', '<', '>', '|', ':',
    '-', '#',
];

/// Returns the character that closes a pattern opened by `delimiter`.
/// Bracket-style delimiters close with their counterpart, anything else
/// closes with itself.
pub fn closing_delimiter(delimiter: char) -> char {
    match delimiter {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// Escapes every special character, and the delimiter, so that `input` can be
/// spliced literally into a pattern wrapped in `delimiter`.
pub fn quote(input: &str, delimiter: char) -> String {
    let closing = closing_delimiter(delimiter);
    let mut quoted = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        if c == '\0' {
            quoted.push_str("\\000");
            continue;
        }
        if SPECIAL_CHARS.contains(&c) || c == delimiter || c == closing {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}

/// A finalized pattern split into its delimiter, body and trailing modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedPattern<'p> {
    pub delimiter: char,
    pub body: &'p str,
    pub modifiers: &'p str,
}

impl<'p> DelimitedPattern<'p> {
    /// Splits e.g. `~^foo$~i` into `~`, `^foo$` and `i`. The end delimiter is
    /// the first unescaped closing delimiter; bracket delimiters may nest.
    pub fn parse(pattern: &'p str) -> Result<Self, CompileError> {
        let trimmed = pattern.trim_start();
        let mut chars = trimmed.char_indices();
        let Some((_, delimiter)) = chars.next() else {
            return Err(CompileError::new("Empty regular expression"));
        };
        if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter == '\0' {
            return Err(CompileError::new(
                "Delimiter must not be alphanumeric, backslash, or NUL",
            ));
        }

        let body_start = delimiter.len_utf8();
        let closing = closing_delimiter(delimiter);
        let mut depth = 0usize;
        let mut escaped = false;
        for (pos, c) in chars {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
            } else if c == closing {
                if depth == 0 {
                    return Ok(Self {
                        delimiter,
                        body: &trimmed[body_start..pos],
                        modifiers: &trimmed[pos + c.len_utf8()..],
                    });
                }
                depth -= 1;
            } else if c == delimiter && closing != delimiter {
                depth += 1;
            }
        }

        Err(CompileError::new(format!(
            "No ending delimiter '{closing}' found"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_escapes_each_special_char() {
        for c in SPECIAL_CHARS {
            assert_eq!(quote(&c.to_string(), '~'), format!("\\{c}"));
        }
        assert_eq!(quote("~", '~'), "\\~");
        assert_eq!(quote("/", '/'), "\\/");
        assert_eq!(quote("/", '~'), "/");
        assert_eq!(quote("a\0b", '~'), "a\\000b");
        assert_eq!(quote("{{ value }}", '~'), "\\{\\{ value \\}\\}");
    }

    #[test]
    fn test_parse_simple() {
        let parsed = DelimitedPattern::parse("~^foo$~i").unwrap();
        assert_eq!(parsed.delimiter, '~');
        assert_eq!(parsed.body, "^foo$");
        assert_eq!(parsed.modifiers, "i");

        let parsed = DelimitedPattern::parse("~~").unwrap();
        assert_eq!(parsed.body, "");
        assert_eq!(parsed.modifiers, "");
    }

    #[test]
    fn test_parse_skips_escaped_delimiter() {
        let parsed = DelimitedPattern::parse(r"/a\/b/ms").unwrap();
        assert_eq!(parsed.body, r"a\/b");
        assert_eq!(parsed.modifiers, "ms");
    }

    #[test]
    fn test_parse_bracket_delimiters_nest() {
        let parsed = DelimitedPattern::parse("{a{2}b}x").unwrap();
        assert_eq!(parsed.delimiter, '{');
        assert_eq!(parsed.body, "a{2}b");
        assert_eq!(parsed.modifiers, "x");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            DelimitedPattern::parse("").unwrap_err().message(),
            "Empty regular expression"
        );
        assert_eq!(
            DelimitedPattern::parse("   ").unwrap_err().message(),
            "Empty regular expression"
        );
        assert_eq!(
            DelimitedPattern::parse("foo").unwrap_err().message(),
            "Delimiter must not be alphanumeric, backslash, or NUL"
        );
        assert_eq!(
            DelimitedPattern::parse("~foo").unwrap_err().message(),
            "No ending delimiter '~' found"
        );
        assert_eq!(
            DelimitedPattern::parse(r"~foo\~").unwrap_err().message(),
            "No ending delimiter '~' found"
        );
    }
}
