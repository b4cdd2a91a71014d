//! First-token extraction for command lines.

/// Extracts the first whitespace- or quote-delimited token of a command.
///
/// A leading single or double quote delimits the token up to the next
/// occurrence of the same quote character; an unterminated quote takes the
/// rest of the string. Anything else yields the maximal run of
/// non-whitespace characters. This is a best-effort lexical pass, not a
/// shell tokenizer — escaped quotes and variable expansion are out of scope.
pub fn first_token(command: &str) -> &str {
    let trimmed = command.trim();

    match trimmed.chars().next() {
        None => "",
        Some(quote @ ('\'' | '"')) => {
            let rest = &trimmed[quote.len_utf8()..];
            match rest.find(quote) {
                Some(end) => &rest[..end],
                None => rest,
            }
        }
        Some(_) => trimmed.split_whitespace().next().unwrap_or(trimmed),
    }
}
