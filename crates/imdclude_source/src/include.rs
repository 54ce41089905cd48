//! Recognition of `#include "path"` directives.

use regex::Regex;
use std::sync::OnceLock;

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"#include "(\S+)""#).expect("include pattern is valid"))
}

/// Returns the path named by the first `#include "<path>"` directive on `line`.
///
/// The path is a maximal run of non-whitespace characters; there is no
/// escaping and only the first directive on a line is honored.
pub fn find_include(line: &str) -> Option<&str> {
    include_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
