use crate::model::ShutdownStep;
use crate::tokenizer::tokenize_line;

/// Parses a multi-line shutdown blob into its ordered steps.
///
/// Lines that do not tokenize are skipped without notice.
pub fn build_sequence(raw: &str) -> Vec<ShutdownStep> {
    build_sequence_with(raw, |_| {})
}

/// Same as [`build_sequence`], calling `on_miss` with every non-blank line that
/// yields no step.
pub fn build_sequence_with<F>(raw: &str, mut on_miss: F) -> Vec<ShutdownStep>
where
    F: FnMut(&str),
{
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut steps = Vec::new();
    for line in normalized.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match tokenize_line(line) {
            Some(step) => steps.push(step),
            None => on_miss(line),
        }
    }
    steps
}
