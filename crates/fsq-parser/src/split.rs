//! Splitting an input line into `;`-separated statements.

/// One statement's slice of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The statement text, untrimmed.
    pub text: &'a str,
    /// Byte offset of `text` inside the line.
    pub offset: usize,
}

impl<'a> Segment<'a> {
    /// Whether the segment holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split `line` on top-level `;`.
///
/// Only literal state is tracked, so a `;` inside a string, raw string or
/// rune literal never splits, and malformed text elsewhere cannot hide a
/// later separator. Empty segments are kept; a line without `;` yields one
/// segment covering the whole line.
pub fn split_statements(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in line.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some('`') if ch == '`' => quote = None,
            Some('`') => {}
            Some(_) if ch == '\\' => escaped = true,
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '`' | '\'' => quote = Some(ch),
                ';' => {
                    segments.push(Segment {
                        text: &line[start..i],
                        offset: start,
                    });
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    segments.push(Segment {
        text: &line[start..],
        offset: start,
    });
    segments
}
