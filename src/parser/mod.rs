//! Source text to [`Node`] trees
//!
//! Parsing is done by `oxc_parser`; the arena tree it produces is lowered into
//! the owned node model, and comments are attached to the statements they
//! precede or follow on the same line.

mod code_frame;
mod lower;

pub use code_frame::code_frame;

use oxc_allocator::Allocator;
use oxc_ast::{Comment as OxcComment, CommentPosition};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::ast::{Comment, Node};
use crate::error::{Error, Result};

/// Parse `source` as a script into a `Program` node
pub fn parse(source: &str) -> Result<Node> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_script(true);
    let ret = Parser::new(&allocator, source, source_type).parse();

    if let Some(error) = ret.errors.first() {
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset())
            .unwrap_or(0);
        let (line, column) = line_column(source, offset);
        log::debug!("parse failed at {}:{}: {}", line, column, error.message);
        return Err(Error::Parse {
            message: error.message.to_string(),
            line,
            column,
        });
    }
    if ret.panicked {
        return Err(Error::Parse {
            message: "parser gave up".to_string(),
            line: 1,
            column: 0,
        });
    }

    let mut program = lower::Lowerer::new(source).program(&ret.program)?;
    let comments: Vec<Pending> = ret
        .program
        .comments
        .iter()
        .map(|comment| Pending::new(comment, source))
        .collect();
    if !comments.is_empty() {
        attach_comments(&mut program, comments, source);
    }
    Ok(program)
}

/// 1-based line and 0-based column of a byte offset
pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(offset, |newline| offset - newline - 1);
    (line, column)
}

struct Pending {
    comment: Comment,
    start: u32,
    attached_to: u32,
    trailing: bool,
    used: bool,
}

impl Pending {
    fn new(comment: &OxcComment, source: &str) -> Self {
        let text = comment.span.source_text(source);
        let comment_value = if let Some(line) = text.strip_prefix("//") {
            Comment::line(line)
        } else {
            let body = text.strip_prefix("/*").unwrap_or(text);
            Comment::block(body.strip_suffix("*/").unwrap_or(body))
        };
        Self {
            comment: comment_value,
            start: comment.span.start,
            attached_to: comment.attached_to,
            trailing: comment.position == CommentPosition::Trailing,
            used: false,
        }
    }
}

/// Hand every comment to the outermost statement it belongs to
fn attach_comments(program: &mut Node, mut comments: Vec<Pending>, source: &str) {
    fn visit(node: &mut Node, comments: &mut [Pending], source: &str) {
        if node.is_statement() {
            if let Some(span) = node.span {
                for pending in comments.iter_mut().filter(|p| !p.used) {
                    if !pending.trailing && pending.attached_to == span.start {
                        node.leading_comments.push(pending.comment.clone());
                        pending.used = true;
                    } else if pending.trailing && ends_on_same_line(source, span.end, pending.start) {
                        node.trailing_comments.push(pending.comment.clone());
                        pending.used = true;
                    }
                }
            }
        }
        node.for_each_child_mut(|child| visit(child, comments, source));
    }

    visit(program, &mut comments, source);
    let dropped = comments.iter().filter(|p| !p.used).count();
    if dropped > 0 {
        log::debug!("{} comments were not attached to a statement", dropped);
    }
}

fn ends_on_same_line(source: &str, end: u32, comment_start: u32) -> bool {
    if end > comment_start {
        return false;
    }
    source
        .get(end as usize..comment_start as usize)
        .map_or(false, |gap| gap.chars().all(|c| c == ' ' || c == '\t'))
}
