fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Identifier under a zero-based cursor position
///
/// The identifier is the maximal run of `[A-Za-z0-9_]` touching the cursor,
/// plus one trailing `?` or `!`. A cursor just past the end of a word still
/// selects it.
pub fn word_at(text: &str, line: usize, column: usize) -> Option<String> {
    let chars: Vec<char> = text.split('\n').nth(line)?.chars().collect();
    if column > chars.len() {
        return None;
    }

    let anchor = if chars.get(column).copied().is_some_and(is_word_char) {
        column
    } else if column > 0 && is_word_char(chars[column - 1]) {
        column - 1
    } else if column > 1
        && matches!(chars.get(column - 1), Some('?' | '!'))
        && is_word_char(chars[column - 2])
    {
        column - 2
    } else {
        return None;
    };

    let mut start = anchor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    if matches!(chars.get(end), Some('?' | '!')) {
        end += 1;
    }

    Some(chars[start..end].iter().collect())
}
