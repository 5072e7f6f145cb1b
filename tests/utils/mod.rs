use regex as rust_regex;
use reggie::{Key, Regex};

/// Runs `body` both through reggie (wrapped as `~body~flags`) and through
/// rust-regex directly, and compares compilation and every capture. Panics if
/// an inconsistency is detected.
pub fn check_against_rust_regex(body: &str, flags: &str, input: &str) {
    let ours = Regex::new(format!("~{body}~{flags}"));
    let rust = rust_regex::RegexBuilder::new(body)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build();

    let rust_re = match rust {
        Ok(rust_re) => rust_re,
        Err(e) => {
            assert!(
                ours.test(input).is_err(),
                "rust-regex failed to compile {body:?} but reggie succeeded: {e}"
            );
            return;
        }
    };

    // find
    let rust_groups = rust_re.captures(input).map(|caps| positional(&caps));
    let my_groups = ours
        .find(input)
        .unwrap_or_else(|e| panic!("reggie failed to compile {body:?}: {e}"))
        .map(|m| indexed_values(m.iter()));
    assert_eq!(
        my_groups, rust_groups,
        "Mismatch for pattern {:?} input {:?} (find)",
        body, input
    );

    // find_all
    let rust_all: Vec<Vec<String>> = rust_re.captures_iter(input).map(|c| positional(&c)).collect();
    let my_all: Vec<Vec<String>> = ours
        .find_all(input)
        .unwrap_or_else(|e| panic!("reggie failed to compile {body:?}: {e}"))
        .unwrap_or_default()
        .iter()
        .map(|m| indexed_values(m.iter()))
        .collect();
    assert_eq!(
        my_all, rust_all,
        "Mismatch for pattern {:?} input {:?} (find_all)",
        body, input
    );

    // test
    assert_eq!(ours.test(input), Ok(rust_re.is_match(input)));
}

fn positional(caps: &rust_regex::Captures<'_>) -> Vec<String> {
    (0..caps.len())
        .map(|i| caps.get(i).map(|m| m.as_str()).unwrap_or_default().to_string())
        .collect()
}

fn indexed_values<'a>(captures: impl Iterator<Item = (&'a Key, &'a str)>) -> Vec<String> {
    captures
        .filter(|(key, _)| matches!(key, Key::Index(_)))
        .map(|(_, value)| value.to_string())
        .collect()
}
