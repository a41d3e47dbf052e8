//! ui::wrap
//!
//! Word wrapping for help text columns.
//!
//! The first line of the result is never indented; the caller has already
//! placed it after a name column. Continuation lines are indented so they
//! line up under the first one.

/// Below this many usable columns the text is moved onto its own block.
const MIN_WRAP_WIDTH: usize = 24;

/// Indent used when the text is moved onto its own block.
const BLOCK_INDENT: usize = 16;

/// How far a line may run over to avoid a short orphan word.
const SLOP: usize = 5;

/// Split `text` at the last whitespace within `limit` bytes.
///
/// Returns the whole text when it fits within `limit + slop`, or when there
/// is no usable break point.
fn split_line(limit: usize, slop: usize, text: &str) -> (&str, &str) {
    if limit + slop > text.len() {
        return (text, "");
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let head = &text[..end];

    let Some(space) = head.rfind([' ', '\t', '\n']) else {
        return (text, "");
    };
    if space == 0 {
        return (text, "");
    }
    if let Some(newline) = head.rfind('\n') {
        if newline > 0 && newline < space {
            return (&text[..newline], &text[newline + 1..]);
        }
    }
    (&text[..space], &text[space + 1..])
}

/// Wrap `text` to `width` columns with continuation lines indented by
/// `indent`. A `width` of 0 disables wrapping; embedded newlines are still
/// indented.
pub fn wrap(indent: usize, width: usize, text: &str) -> String {
    if width == 0 {
        return text.replace('\n', &format!("\n{}", " ".repeat(indent)));
    }

    let mut indent = indent;
    let mut avail = width.saturating_sub(indent);
    let mut out = String::new();

    if avail < MIN_WRAP_WIDTH {
        indent = BLOCK_INDENT;
        avail = width.saturating_sub(indent);
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }
    if avail < MIN_WRAP_WIDTH {
        return text.replace('\n', &out);
    }

    let avail = avail - SLOP;
    let line_break = format!("\n{}", " ".repeat(indent));

    let (first, mut rest) = split_line(avail, SLOP, text);
    out.push_str(&first.replace('\n', &line_break));

    while !rest.is_empty() {
        let (line, remainder) = split_line(avail, SLOP, rest);
        out.push_str(&line_break);
        out.push_str(&line.replace('\n', &line_break));
        rest = remainder;
    }

    out
}
