//! Newline index for line-span patching.
//!
//! Goals
//! - Single pass over bytes to record '\n' positions.
//! - 1-based external line numbers (same as tree-sitter row + 1).
//! - Span ends exclude the terminator, including a CRLF '\r'.
//! - Detect the dominant line terminator so inserted text matches it.
//!
//! Notes
//! - An empty buffer has 0 lines.
//! - A buffer ending in '\n' has no phantom empty last line.
//! - For spans, end is exclusive (Rust slicing convention).

#[derive(Debug, Clone)]
pub struct NewlineIndex
{
    /// Byte positions of every '\n' in the buffer.
    nl_positions: Vec<usize>,
    /// Total byte length of the buffer.
    len: usize,
}

impl NewlineIndex
{
    /// Build an index recording positions of '\n'.
    pub fn build(bytes: &[u8]) -> Self
    {
        let nl_positions: Vec<usize> = memchr::memchr_iter(b'\n', bytes).collect();

        Self { nl_positions, len: bytes.len() }
    }

    /// Number of physical lines. A trailing '\n' closes the
    /// last line rather than opening a new one.
    pub fn line_count(&self) -> usize
    {
        match self.nl_positions.last()
        {
            None if self.len == 0 => 0,
            None => 1,
            Some(&last) if last + 1 == self.len => self.nl_positions.len(),
            Some(_) => self.nl_positions.len() + 1,
        }
    }

    /// Whether the buffer is empty or its last line is terminated.
    pub fn ends_with_newline(&self) -> bool
    {
        self.len == 0 || self.nl_positions.last().is_some_and(|&p| p + 1 == self.len)
    }

    /// Start byte (inclusive) of a 1-based line.
    pub fn start_byte_of_line(
        &self,
        line1: usize,
    ) -> Option<usize>
    {
        if line1 == 0 || line1 > self.line_count()
        {
            return None;
        }
        if line1 == 1
        {
            return Some(0);
        }
        self.nl_positions
            .get(line1 - 2)
            .map(|&prev| prev + 1)
    }

    /// End byte (exclusive) of a 1-based line, terminator excluded.
    pub fn end_byte_of_line(
        &self,
        line1: usize,
        bytes: &[u8],
    ) -> Option<usize>
    {
        if line1 == 0 || line1 > self.line_count()
        {
            return None;
        }

        match self.nl_positions.get(line1 - 1)
        {
            Some(&nl) if nl > 0 && bytes.get(nl - 1) == Some(&b'\r') => Some(nl - 1),
            Some(&nl) => Some(nl),
            // Last line without trailing '\n' ends at EOF.
            None => Some(self.len),
        }
    }

    /// Byte span `(start, end)` covering the inclusive 1-based line range,
    /// without the final line's terminator.
    pub fn span_for_lines(
        &self,
        start_line1: usize,
        end_line1: usize,
        bytes: &[u8],
    ) -> Option<(usize, usize)>
    {
        if start_line1 > end_line1
        {
            return None;
        }
        let s = self.start_byte_of_line(start_line1)?;
        let e = self.end_byte_of_line(end_line1, bytes)?;
        (s <= e).then_some((s, e))
    }

    /// Line terminator used by the buffer: CRLF if the first
    /// terminator is CRLF, LF otherwise (including no terminator).
    pub fn line_ending(
        &self,
        bytes: &[u8],
    ) -> &'static str
    {
        match self.nl_positions.first()
        {
            Some(&nl) if nl > 0 && bytes[nl - 1] == b'\r' => "\r\n",
            _ => "\n",
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn counts_lines_without_phantom_tail()
    {
        assert_eq!(NewlineIndex::build(b"").line_count(), 0);
        assert_eq!(NewlineIndex::build(b"a").line_count(), 1);
        assert_eq!(NewlineIndex::build(b"a\n").line_count(), 1);
        assert_eq!(NewlineIndex::build(b"a\nb").line_count(), 2);
        assert_eq!(NewlineIndex::build(b"a\n\n").line_count(), 2);
    }

    #[test]
    fn spans_exclude_terminators()
    {
        let text = b"one\r\ntwo\r\nthree";
        let idx = NewlineIndex::build(text);

        assert_eq!(idx.span_for_lines(1, 1, text), Some((0, 3)));
        assert_eq!(idx.span_for_lines(2, 3, text), Some((5, 15)));
        assert_eq!(&text[5..15], b"two\r\nthree");
        assert_eq!(idx.span_for_lines(4, 4, text), None);
        assert_eq!(idx.span_for_lines(0, 1, text), None);
    }

    #[test]
    fn detects_line_ending()
    {
        let crlf = b"a\r\nb\r\n";
        let lf = b"a\nb\n";
        assert_eq!(NewlineIndex::build(crlf).line_ending(crlf), "\r\n");
        assert_eq!(NewlineIndex::build(lf).line_ending(lf), "\n");
        assert_eq!(NewlineIndex::build(b"x").line_ending(b"x"), "\n");
    }

    #[test]
    fn trailing_newline_detection()
    {
        assert!(NewlineIndex::build(b"").ends_with_newline());
        assert!(NewlineIndex::build(b"a\n").ends_with_newline());
        assert!(!NewlineIndex::build(b"a").ends_with_newline());
    }
}
