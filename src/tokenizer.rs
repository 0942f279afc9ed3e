use serde::Serialize;

use crate::normalizer::is_punctuation_char;

/// Matching state of one reference word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WordStatus {
    Waiting,
    Current,
    Correct,
    Incorrect,
}

/// One word or punctuation unit of the reference passage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Token {
    pub text: String,
    pub status: WordStatus,
    pub confidence: f64,
    pub is_punctuation: bool,
}

impl Token {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            status: WordStatus::Waiting,
            confidence: 0.0,
            is_punctuation: text.chars().all(is_punctuation_char),
        }
    }

    pub fn is_word(&self) -> bool {
        !self.is_punctuation
    }
}

/// Split normalized text into tokens and mark the first word current.
pub fn tokenize(normalized: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = normalized
        .split(' ')
        .filter(|piece| !piece.is_empty())
        .map(Token::new)
        .collect();

    if let Some(idx) = first_word_index(&tokens) {
        tokens[idx].status = WordStatus::Current;
    }

    tokens
}

pub fn first_word_index(tokens: &[Token]) -> Option<usize> {
    tokens.iter().position(Token::is_word)
}
