use itertools::Itertools;

/// Characters that form punctuation tokens.
pub const PUNCTUATION: [char; 4] = ['.', '!', '?', ','];

pub fn is_punctuation_char(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

fn is_supported(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' || is_punctuation_char(c)
}

/// Normalize text for matching.
///
/// Lowercases, keeps only `[a-z0-9 .!?,]`, splits punctuation runs off the
/// words they touch and collapses whitespace. Any whitespace counts as a
/// space, so line breaks in a passage still separate words.
pub fn normalize(text: &str) -> String {
    let mut padded = String::with_capacity(text.len());
    let mut prev_punct = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = if c.is_whitespace() { ' ' } else { c };
        if !is_supported(c) {
            continue;
        }

        let punct = is_punctuation_char(c);
        if punct != prev_punct {
            padded.push(' ');
        }
        padded.push(c);
        prev_punct = punct;
    }

    padded.split_whitespace().join(" ")
}

/// Last word of a normalized transcript, skipping trailing punctuation some
/// recognizers append.
pub fn last_spoken_word(normalized: &str) -> Option<&str> {
    normalized
        .split(' ')
        .rev()
        .find(|w| !w.is_empty() && !w.chars().all(is_punctuation_char))
}
