use std::sync::LazyLock;

use regex::Regex;

use crate::model::ShutdownStep;

// Either a quoted span without inner quotes, or a run of non-quote non-space chars.
static PROGRAM_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?:"([^"]*)"|([^"\s]+))"#).ok());

/// Splits one trimmed configuration line into a program and its argument string.
///
/// The program may be wrapped in a single pair of double quotes, in which case the
/// quotes are stripped and embedded whitespace is kept. The arguments are whatever
/// follows the matched token and one separating character. The first token found
/// anywhere in the line wins, so a stray leading quote is skipped over. Returns
/// `None` when no token is found or the first one is an empty quoted pair.
pub fn tokenize_line(line: &str) -> Option<ShutdownStep> {
    let captures = PROGRAM_TOKEN.as_ref()?.captures(line)?;
    let matched = captures.get(0)?;
    let program = captures.get(1).or_else(|| captures.get(2))?.as_str();
    if program.is_empty() {
        return None;
    }

    let rest = &line[matched.end()..];
    let arguments = match rest.chars().next() {
        Some(separator) => &rest[separator.len_utf8()..],
        None => "",
    };

    Some(ShutdownStep::new(program, arguments))
}

/// Splits an argument string into argv entries for hosts without a raw command line.
///
/// Same rule as the program token: a double-quoted span is one argument with the
/// quotes removed, anything else splits on whitespace. Quotes do not nest.
pub fn split_arguments(arguments: &str) -> Vec<String> {
    let Some(token) = PROGRAM_TOKEN.as_ref() else {
        return arguments.split_whitespace().map(str::to_string).collect();
    };
    token
        .captures_iter(arguments)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
