// Chunk: docs/chunks/sexp_scanner - Balanced-expression scanner over a gap buffer

//! S-expression scanner: structural navigation over buffer bytes.
//!
//! The scanner walks a [`GapBuffer`] under a [`SyntaxTable`] and produces
//! byte positions, never trees. One "sexp" is either a balanced
//! parenthesized form (any registered pair, arbitrarily nested), a string
//! literal, or an atom — a maximal run of non-delimiter bytes.
//!
//! All functions are pure in `(buffer bytes, table)`: identical inputs
//! produce identical positions and identical error kinds. Nothing here
//! mutates the buffer.

use thiserror::Error;

use crate::gap_buffer::GapBuffer;
use crate::syntax::{SyntaxClass, SyntaxTable};

/// Why a scan stopped without producing a position.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Nothing left to scan at or past the end of the buffer.
    #[error("end of buffer")]
    EndOfBuffer,
    /// The buffer ended inside an open balanced form.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    /// A closer appeared that does not match the innermost open form.
    #[error("mismatched parentheses")]
    MismatchedParentheses,
    /// A top-level scan began at a closer.
    #[error("unexpected close parenthesis")]
    UnexpectedCloseParen,
    /// The buffer ended inside a string literal.
    #[error("unbalanced string literal")]
    UnbalancedString,
    /// An opener byte has no closer registered in the syntax table.
    #[error("opener has no matching closer in the syntax table")]
    InvalidSyntax,
    /// Backward scanning is not supported.
    #[error("backward scanning is not implemented")]
    NotImplemented,
}

/// Advances past whitespace runs and entire line comments.
///
/// A line comment begins at a [`SyntaxClass::CommentStart`] byte and
/// extends through (and including) the next LF, or to the end of the
/// buffer. The result is the first position holding neither whitespace
/// nor a comment, so the function is idempotent.
pub fn skip_whitespace(buffer: &GapBuffer, table: &SyntaxTable, mut pos: usize) -> usize {
    while let Some(byte) = buffer.byte_at(pos) {
        match table.class_of(byte) {
            SyntaxClass::Whitespace => pos += 1,
            SyntaxClass::CommentStart => {
                pos += 1;
                while let Some(byte) = buffer.byte_at(pos) {
                    pos += 1;
                    if byte == b'\n' {
                        break;
                    }
                }
            }
            _ => break,
        }
    }
    pos
}

/// Returns the position immediately after one complete s-expression
/// starting at or after `pos`.
///
/// Dispatches on the syntax class of the first significant byte:
/// balanced forms match their registered closer through arbitrary
/// nesting; string literals honor escapes; atoms run until the next
/// delimiter. An [`SyntaxClass::Escape`] byte outside a string heads an
/// atom like any other constituent, so a lone `\` scans as a one-byte
/// atom.
pub fn scan_sexp(buffer: &GapBuffer, table: &SyntaxTable, pos: usize) -> Result<usize, ScanError> {
    let start = skip_whitespace(buffer, table, pos);
    let first = buffer.byte_at(start).ok_or(ScanError::EndOfBuffer)?;
    match table.class_of(first) {
        SyntaxClass::OpenParen => scan_balanced(buffer, table, start, first),
        SyntaxClass::StringQuote => scan_string(buffer, table, start),
        SyntaxClass::CloseParen => Err(ScanError::UnexpectedCloseParen),
        SyntaxClass::Word
        | SyntaxClass::Symbol
        | SyntaxClass::Punctuation
        | SyntaxClass::Escape => Ok(scan_atom(buffer, table, start)),
        // CommentEnd (and anything else a custom table produces) is a
        // one-byte form. Whitespace and CommentStart cannot reach here.
        _ => Ok(start + 1),
    }
}

/// Applies [`scan_sexp`] `n` times and returns the final position.
///
/// `n = 0` returns `pos` unchanged. Negative counts (backward scanning)
/// return [`ScanError::NotImplemented`].
pub fn scan_sexp_n(
    buffer: &GapBuffer,
    table: &SyntaxTable,
    pos: usize,
    n: isize,
) -> Result<usize, ScanError> {
    if n < 0 {
        return Err(ScanError::NotImplemented);
    }
    let mut pos = pos;
    for _ in 0..n {
        pos = scan_sexp(buffer, table, pos)?;
    }
    Ok(pos)
}

/// Scans a balanced form whose opener sits at `open_pos`.
///
/// Maintains an explicit stack of expected closers instead of recursing,
/// so nesting depth is bounded by the heap rather than the call stack.
fn scan_balanced(
    buffer: &GapBuffer,
    table: &SyntaxTable,
    open_pos: usize,
    open_byte: u8,
) -> Result<usize, ScanError> {
    let mut expected = vec![table
        .matching_close(open_byte)
        .ok_or(ScanError::InvalidSyntax)?];
    let mut pos = open_pos + 1;

    loop {
        pos = skip_whitespace(buffer, table, pos);
        let byte = buffer
            .byte_at(pos)
            .ok_or(ScanError::UnbalancedParentheses)?;
        match table.class_of(byte) {
            SyntaxClass::CloseParen => {
                if expected.last().copied() != Some(byte) {
                    return Err(ScanError::MismatchedParentheses);
                }
                expected.pop();
                pos += 1;
                if expected.is_empty() {
                    return Ok(pos);
                }
            }
            SyntaxClass::OpenParen => {
                expected.push(table.matching_close(byte).ok_or(ScanError::InvalidSyntax)?);
                pos += 1;
            }
            SyntaxClass::StringQuote => {
                pos = scan_string(buffer, table, pos)?;
            }
            SyntaxClass::CommentEnd => {
                pos += 1;
            }
            _ => {
                pos = scan_atom(buffer, table, pos);
            }
        }
    }
}

/// Scans a string literal whose opening quote sits at `quote_pos`.
/// Returns the position just past the closing quote.
fn scan_string(
    buffer: &GapBuffer,
    table: &SyntaxTable,
    quote_pos: usize,
) -> Result<usize, ScanError> {
    let mut pos = quote_pos + 1;
    loop {
        let byte = buffer.byte_at(pos).ok_or(ScanError::UnbalancedString)?;
        match table.class_of(byte) {
            // The escape consumes itself and the byte it quotes, even if
            // that byte would otherwise close the string.
            SyntaxClass::Escape => pos += 2,
            SyntaxClass::StringQuote => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
}

/// Scans an atom headed at `start`: consumes bytes until the next byte is
/// a delimiter (whitespace, either paren class, a string quote, or a
/// comment start). An atom is always at least one byte.
fn scan_atom(buffer: &GapBuffer, table: &SyntaxTable, start: usize) -> usize {
    let mut pos = start + 1;
    while let Some(byte) = buffer.byte_at(pos) {
        if is_atom_delimiter(table.class_of(byte)) {
            break;
        }
        pos += 1;
    }
    pos
}

fn is_atom_delimiter(class: SyntaxClass) -> bool {
    matches!(
        class,
        SyntaxClass::Whitespace
            | SyntaxClass::OpenParen
            | SyntaxClass::CloseParen
            | SyntaxClass::StringQuote
            | SyntaxClass::CommentStart
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(content: &[u8]) -> GapBuffer {
        GapBuffer::from_bytes(content)
    }

    #[test]
    fn test_skip_whitespace_runs() {
        let buf = buffer(b"   \t\n  x");
        let table = SyntaxTable::standard();
        assert_eq!(skip_whitespace(&buf, &table, 0), 7);
        assert_eq!(skip_whitespace(&buf, &table, 7), 7);
    }

    #[test]
    fn test_skip_whitespace_line_comment() {
        let buf = buffer(b"; a comment\n  x");
        let table = SyntaxTable::standard();
        assert_eq!(skip_whitespace(&buf, &table, 0), 14);
    }

    #[test]
    fn test_skip_whitespace_comment_to_eob() {
        let buf = buffer(b"x ; trailing");
        let table = SyntaxTable::standard();
        assert_eq!(skip_whitespace(&buf, &table, 1), buf.len());
    }

    #[test]
    fn test_skip_whitespace_is_idempotent() {
        let buf = buffer(b"  ;; c\n\t (a)");
        let table = SyntaxTable::standard();
        let once = skip_whitespace(&buf, &table, 0);
        assert_eq!(skip_whitespace(&buf, &table, once), once);
    }

    #[test]
    fn test_scan_atom_single_and_run() {
        let buf = buffer(b"a foo-bar_baz c");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(1));
        assert_eq!(scan_sexp(&buf, &table, 1), Ok(13));
        assert_eq!(scan_sexp(&buf, &table, 13), Ok(15));
    }

    #[test]
    fn test_scan_nested_form() {
        let buf = buffer(b"(a (b c) d)");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(11));
        assert_eq!(scan_sexp(&buf, &table, 3), Ok(8));
    }

    #[test]
    fn test_scan_mixed_bracket_kinds() {
        let buf = buffer(b"{[()] (x)}");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(10));
    }

    #[test]
    fn test_scan_mismatched_closer() {
        let buf = buffer(b"( [ a ) ]");
        let table = SyntaxTable::standard();
        assert_eq!(
            scan_sexp(&buf, &table, 0),
            Err(ScanError::MismatchedParentheses)
        );
    }

    #[test]
    fn test_scan_unbalanced_open() {
        let buf = buffer(b"(a (b)");
        let table = SyntaxTable::standard();
        assert_eq!(
            scan_sexp(&buf, &table, 0),
            Err(ScanError::UnbalancedParentheses)
        );
    }

    #[test]
    fn test_scan_unexpected_close() {
        let buf = buffer(b")  x");
        let table = SyntaxTable::standard();
        assert_eq!(
            scan_sexp(&buf, &table, 0),
            Err(ScanError::UnexpectedCloseParen)
        );
    }

    #[test]
    fn test_scan_end_of_buffer() {
        let buf = buffer(b"   ; only a comment");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Err(ScanError::EndOfBuffer));
        let empty = buffer(b"");
        assert_eq!(scan_sexp(&empty, &table, 0), Err(ScanError::EndOfBuffer));
    }

    #[test]
    fn test_scan_leading_comment_then_form() {
        let buf = buffer(b"; comment\n(foo)");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(15));
    }

    #[test]
    fn test_scan_comment_inside_form() {
        let buf = buffer(b"(a ; note\n b)");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(13));
    }

    #[test]
    fn test_scan_strings_with_escapes() {
        // "foo" "bar \"baz\""
        let buf = buffer(b"\"foo\" \"bar \\\"baz\\\"\"");
        let table = SyntaxTable::standard();
        let first = scan_sexp(&buf, &table, 0);
        assert_eq!(first, Ok(5));
        assert_eq!(scan_sexp(&buf, &table, 5), Ok(19));
    }

    #[test]
    fn test_scan_string_inside_form() {
        let buf = buffer(b"(print \"a (not) form\")");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(22));
    }

    #[test]
    fn test_scan_unterminated_string() {
        let buf = buffer(b"\"never ends");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Err(ScanError::UnbalancedString));
    }

    #[test]
    fn test_scan_string_escape_at_eob() {
        let buf = buffer(b"\"trailing\\");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Err(ScanError::UnbalancedString));
    }

    #[test]
    fn test_scan_opener_without_pair() {
        let mut table = SyntaxTable::standard();
        // Classify '<' as an opener without registering a closer.
        table.set_class(b'<', SyntaxClass::OpenParen);
        let buf = buffer(b"<a>");
        assert_eq!(scan_sexp(&buf, &table, 0), Err(ScanError::InvalidSyntax));
    }

    #[test]
    fn test_scan_escape_outside_string_is_atom() {
        let buf = buffer(b"\\foo (x)");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(4));

        let lone = buffer(b"\\ x");
        assert_eq!(scan_sexp(&lone, &table, 0), Ok(1));
    }

    #[test]
    fn test_scan_sexp_n_counts() {
        let buf = buffer(b"a b c (d e)");
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp_n(&buf, &table, 0, 0), Ok(0));
        assert_eq!(scan_sexp_n(&buf, &table, 0, 3), Ok(5));
        assert_eq!(scan_sexp_n(&buf, &table, 0, 4), Ok(11));
        assert_eq!(scan_sexp_n(&buf, &table, 0, 5), Err(ScanError::EndOfBuffer));
    }

    #[test]
    fn test_scan_sexp_n_backward_not_implemented() {
        let buf = buffer(b"(a)");
        let table = SyntaxTable::standard();
        assert_eq!(
            scan_sexp_n(&buf, &table, 3, -1),
            Err(ScanError::NotImplemented)
        );
    }

    #[test]
    fn test_scanner_is_deterministic() {
        let buf = buffer(b"(alpha [beta {gamma}] \"delta\") ; tail");
        let table = SyntaxTable::standard();
        let first = scan_sexp(&buf, &table, 0);
        for _ in 0..10 {
            assert_eq!(scan_sexp(&buf, &table, 0), first);
        }
    }

    #[test]
    fn test_scan_custom_pair_table() {
        let mut table = SyntaxTable::standard();
        table.set_pair(b'<', b'>');
        let buf = buffer(b"<a <b> c> rest");
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(9));
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 10_000;
        let mut content = Vec::with_capacity(depth * 2 + 1);
        content.extend(std::iter::repeat(b'(').take(depth));
        content.push(b'x');
        content.extend(std::iter::repeat(b')').take(depth));
        let buf = buffer(&content);
        let table = SyntaxTable::standard();
        assert_eq!(scan_sexp(&buf, &table, 0), Ok(content.len()));
    }
}
