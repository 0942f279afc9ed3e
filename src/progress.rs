use crate::tokenizer::{Token, WordStatus};

/// Fraction of words (punctuation excluded) marked correct.
pub fn progress(tokens: &[Token]) -> f64 {
    let words = tokens.iter().filter(|t| t.is_word()).count();
    if words == 0 {
        return 0.0;
    }
    let correct = tokens
        .iter()
        .filter(|t| t.is_word() && t.status == WordStatus::Correct)
        .count();
    correct as f64 / words as f64
}

/// Streak length that must already be reached before a hit earns praise.
pub const PRAISE_AFTER: u32 = 2;

/// Consecutive-correct counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streak {
    current: u32,
    best: u32,
}

impl Streak {
    /// Record a correct word. Returns true when positive feedback is due.
    pub fn hit(&mut self) -> bool {
        let praise = self.current >= PRAISE_AFTER;
        self.current += 1;
        self.best = self.best.max(self.current);
        praise
    }

    pub fn miss(&mut self) {
        self.current = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }
}
