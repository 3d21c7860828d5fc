//! Comment placement for generated code
//!
//! `oxc_codegen` prints a comment when the statement it is attached to
//! starts at the comment's `attached_to` position, and reads the comment text
//! back out of the program's source text. Generated trees have no source, so
//! the comments are written into a synthetic source and every commented
//! statement gets a unique anchor position.

use oxc_ast::ast::CommentNewlines;
use oxc_ast::{Comment as OxcComment, CommentContent, CommentKind as OxcCommentKind, CommentPosition};
use oxc_span::Span;

use crate::ast::{Comment, CommentKind};

#[derive(Debug)]
pub(super) struct CommentLayout {
    source: String,
    comments: Vec<OxcComment>,
    next_anchor: u32,
}

impl CommentLayout {
    pub(super) fn new() -> Self {
        Self {
            source: String::new(),
            comments: Vec::new(),
            // 0 is the span of every uncommented node
            next_anchor: 1,
        }
    }

    /// Lay out `comments` in front of a statement; returns its anchor
    pub(super) fn place(&mut self, comments: &[&Comment]) -> Option<u32> {
        if comments.is_empty() {
            return None;
        }
        let anchor = self.next_anchor;
        self.next_anchor += 1;

        for comment in comments {
            let text = match comment.kind {
                CommentKind::Line => format!("//{}", comment.value),
                CommentKind::Block => format!("/*{}*/", comment.value),
            };
            let start = self.source.len() as u32;
            self.source.push_str(&text);
            self.source.push('\n');
            self.comments.push(OxcComment {
                span: Span::new(start, start + text.len() as u32),
                attached_to: anchor,
                kind: match comment.kind {
                    CommentKind::Line => OxcCommentKind::Line,
                    CommentKind::Block => OxcCommentKind::Block,
                },
                position: CommentPosition::Leading,
                newlines: CommentNewlines::Leading,
                content: CommentContent::None,
            });
        }
        Some(anchor)
    }

    /// The synthetic source and the comments pointing into it
    pub(super) fn finish(self) -> (String, Vec<OxcComment>) {
        (self.source, self.comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors_are_unique_and_nonzero() {
        let mut layout = CommentLayout::new();
        let one = Comment::line(" one");
        let two = Comment::block(" two ");
        let first = layout.place(&[&one]).unwrap();
        let second = layout.place(&[&two]).unwrap();
        assert!(first > 0);
        assert_ne!(first, second);
        assert_eq!(layout.place(&[]), None);
    }

    #[test]
    fn test_spans_cover_comment_text() {
        let mut layout = CommentLayout::new();
        let one = Comment::line(" one");
        let two = Comment::block(" two ");
        layout.place(&[&one, &two]);
        let (source, comments) = layout.finish();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].span.source_text(&source), "// one");
        assert_eq!(comments[1].span.source_text(&source), "/* two */");
    }
}
