/*
 * segment.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Splitting documents into prose and fenced-code segments.
 */

//! Splitting a document into prose and verbatim segments.
//!
//! Rewrites must never reach fenced code blocks, so a document is first
//! partitioned into alternating [`SegmentKind::Prose`] and
//! [`SegmentKind::Verbatim`] runs. The partition is lossless: concatenating
//! the segments in order yields the original document byte-for-byte.
//!
//! ```text
//! Intro with <Card cols={2} />      <- Prose
//! ```jsx                            <- Verbatim (fence line included)
//! <Card cols={2} />
//! ```                               <- Verbatim (closing fence included)
//! Outro                             <- Prose
//! ```
//!
//! A fence is only recognised at the start of a line (up to three spaces of
//! indentation). Backtick runs inside a line, such as inline code spans, are
//! prose. A block that is never closed extends to the end of the document and
//! stays verbatim.

/// Whether a segment may be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Markup-bearing text; rewrite rules apply.
    Prose,
    /// A fenced code block, fences included; passed through untouched.
    Verbatim,
}

/// A contiguous slice of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
    /// Byte offset of `text` within the document.
    pub offset: usize,
}

impl<'a> Segment<'a> {
    pub fn is_prose(&self) -> bool {
        self.kind == SegmentKind::Prose
    }

    pub fn is_verbatim(&self) -> bool {
        self.kind == SegmentKind::Verbatim
    }

    /// Byte range of this segment within the document.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.text.len()
    }
}

/// An opening code fence: the fence character and the length of its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: u8,
    len: usize,
}

/// Lazy iterator over the segments of a document.
///
/// Created by [`segment`].
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    document: &'a str,
    pos: usize,
}

/// Split `document` into ordered prose and verbatim segments.
pub fn segment(document: &str) -> Segments<'_> {
    Segments { document, pos: 0 }
}

/// Concatenate segment texts back into a document.
pub fn reassemble<'a>(segments: impl IntoIterator<Item = Segment<'a>>) -> String {
    segments.into_iter().map(|s| s.text).collect()
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let document = self.document;
        let start = self.pos;
        let rest = &document[start..];
        if rest.is_empty() {
            return None;
        }

        let mut cursor = start;
        for line in rest.split_inclusive('\n') {
            if let Some(fence) = opening_fence(line) {
                if cursor > start {
                    // Emit the prose before this fence; the fence is picked up
                    // again on the next call.
                    self.pos = cursor;
                    return Some(self.emit(SegmentKind::Prose, start, cursor));
                }
                let end = self.block_end(cursor + line.len(), fence);
                self.pos = end;
                return Some(self.emit(SegmentKind::Verbatim, start, end));
            }
            cursor += line.len();
        }

        self.pos = document.len();
        Some(self.emit(SegmentKind::Prose, start, document.len()))
    }
}

impl<'a> Segments<'a> {
    fn emit(&self, kind: SegmentKind, start: usize, end: usize) -> Segment<'a> {
        tracing::trace!(?kind, start, end, "segment");
        let document = self.document;
        Segment {
            kind,
            text: &document[start..end],
            offset: start,
        }
    }

    /// Find the end of a fenced block whose body starts at `body_start`.
    ///
    /// Returns the offset just past the closing fence line, or the end of the
    /// document when the block is unterminated.
    fn block_end(&self, body_start: usize, fence: Fence) -> usize {
        let document = self.document;
        let mut cursor = body_start;
        for line in document[body_start..].split_inclusive('\n') {
            cursor += line.len();
            if closes(line, fence) {
                return cursor;
            }
        }
        document.len()
    }
}

/// Strip up to three spaces of indentation. Four or more means an indented
/// code line, never a fence.
fn strip_fence_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|b| *b == b' ').count();
    if indent > 3 {
        None
    } else {
        Some(&line[indent..])
    }
}

fn fence_run(text: &str, marker: u8) -> usize {
    text.bytes().take_while(|b| *b == marker).count()
}

fn opening_fence(line: &str) -> Option<Fence> {
    let text = strip_fence_indent(line)?;
    let marker = *text.as_bytes().first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let len = fence_run(text, marker);
    if len < 3 {
        return None;
    }
    // A backtick info string cannot itself contain backticks.
    if marker == b'`' && text[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes(line: &str, fence: Fence) -> bool {
    let Some(text) = strip_fence_indent(line) else {
        return false;
    };
    let len = fence_run(text, fence.marker);
    len >= fence.len && text[len..].trim().is_empty()
}
