use std::collections::HashSet;

/// Minimum token length stored in the content index.
/// Shorter tokens are kept by [`tokenize`] so query terms still carry them.
pub const MIN_TOKEN_LENGTH: usize = 3;

/// Returns true for bytes that may appear inside a token: `[A-Za-z0-9_$]`.
#[inline]
pub fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// Returns true for characters that may appear inside a token.
#[inline]
pub fn is_token_char(ch: char) -> bool {
    ch.is_ascii() && is_token_byte(ch as u8)
}

/// Split text into its distinct tokens.
///
/// Any run of characters outside `[A-Za-z0-9_$]` is a delimiter. Tokens are
/// lowercased unless `case_sensitive` is set. Empty tokens are dropped, short
/// ones are not.
pub fn tokenize(text: &str, case_sensitive: bool) -> HashSet<String> {
    token_slices(text)
        .map(|token| {
            if case_sensitive {
                token.to_string()
            } else {
                token.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Tokenize content for indexing: lowercased, tokens shorter than
/// `min_length` dropped.
pub fn extract_index_tokens(content: &str, min_length: usize) -> HashSet<String> {
    token_slices(content)
        .filter(|token| token.len() >= min_length)
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Iterate over the raw token slices of `text`, in order, duplicates included.
///
/// Token characters are ASCII, so every delimiter boundary is a char boundary
/// and slicing by byte offset is safe.
pub fn token_slices(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !is_token_char(ch))
        .filter(|token| !token.is_empty())
}
