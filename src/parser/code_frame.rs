//! Source excerpts pointing at a position

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("source")]
struct Excerpt {
    #[source_code]
    text: NamedSource<String>,
    #[label("here")]
    at: SourceSpan,
}

/// Render the lines around `line`:`column` (1-based line, 0-based column)
/// with a marker under the position.
pub fn code_frame(source: &str, line: usize, column: usize) -> String {
    let offset = offset_of(source, line, column);
    let excerpt = Excerpt {
        text: NamedSource::new("input", source.to_string()),
        at: SourceSpan::from((offset, 0)),
    };

    let mut rendered = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut rendered, &excerpt).is_err() {
        return source.to_string();
    }

    // Drop the header line; the caller supplies its own message
    let frame: Vec<&str> = rendered
        .lines()
        .skip_while(|l| !l.contains("input"))
        .collect();
    if frame.is_empty() {
        rendered
    } else {
        frame.join("\n")
    }
}

fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_contains_source_line() {
        let frame = code_frame("(a +)", 1, 4);
        assert!(frame.contains("(a +)"));
        assert!(frame.contains("here"));
    }

    #[test]
    fn test_offset_of_second_line() {
        assert_eq!(offset_of("ab\ncd", 2, 1), 4);
        assert_eq!(offset_of("ab", 5, 9), 2);
    }
}
