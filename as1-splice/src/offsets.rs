/// Converts an offset counted in UTF-16 code units into code points.
///
/// An offset that lands inside a surrogate pair rounds up to the next code
/// point. Offsets past the end clamp to the code point count.
pub fn utf16_to_code_points(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (index, ch) in text.chars().enumerate() {
        if units >= offset {
            return index;
        }
        units += ch.len_utf16();
    }
    text.chars().count()
}

/// `(start, length)` in UTF-16 code units to the same span in code points.
pub fn utf16_span(text: &str, offset: usize, length: usize) -> (usize, usize) {
    let start = utf16_to_code_points(text, offset);
    let end = utf16_to_code_points(text, offset.saturating_add(length));
    (start, end.saturating_sub(start))
}

/// Byte offset of every code point boundary, including the end.
pub(crate) fn boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .collect()
}
