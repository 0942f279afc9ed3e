use serde::Serialize;
use tracing::{debug, info, trace};

use crate::confusion::ConfusionTable;
use crate::feedback::FeedbackKind;
use crate::matching_policy::{MatchPolicy, Verdict};
use crate::normalizer::{last_spoken_word, normalize};
use crate::progress::{progress, Streak};
use crate::tokenizer::{first_word_index, tokenize, Token, WordStatus};
use crate::util::mean;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    InProgress,
}

/// What one transcript update did to the word under the cursor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transition {
    pub index: usize,
    pub word: String,
    pub heard: String,
    pub outcome: Outcome,
    pub confidence: f64,
    pub feedback: Option<FeedbackKind>,
}

/// Read-only view handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tokens: Vec<Token>,
    pub cursor: Option<usize>,
    pub progress: f64,
    pub streak: u32,
    pub best_streak: u32,
    pub finished: bool,
}

/// End-of-passage figures.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub words: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub mean_confidence: Option<f64>,
    pub best_streak: u32,
}

/// A reference passage being read aloud, word by word.
#[derive(Debug)]
pub struct Recital {
    reference: String,
    tokens: Vec<Token>,
    cursor: usize,
    streak: Streak,
    progress: f64,
    policy: MatchPolicy,
    confusions: ConfusionTable,
    retry_incorrect: bool,
    last_transcript: Option<String>,
}

impl Recital {
    pub fn new(policy: MatchPolicy, confusions: ConfusionTable) -> Self {
        Self {
            reference: String::new(),
            tokens: Vec::new(),
            cursor: 0,
            streak: Streak::default(),
            progress: 0.0,
            policy,
            confusions,
            retry_incorrect: false,
            last_transcript: None,
        }
    }

    pub fn with_reference(mut self, text: &str) -> Self {
        self.apply_reference_text(text);
        self
    }

    /// Let an incorrect word be judged again on the next distinct utterance
    /// instead of staying incorrect until reset.
    pub fn retry_incorrect(mut self, retry: bool) -> Self {
        self.retry_incorrect = retry;
        self
    }

    /// Replace the reference passage and rebuild the sequence.
    pub fn apply_reference_text(&mut self, text: &str) {
        self.reference = text.to_string();
        self.reset();
    }

    /// Rebuild the sequence for the current passage and clear the session.
    pub fn reset(&mut self) {
        self.tokens = tokenize(&normalize(&self.reference));
        self.cursor = first_word_index(&self.tokens).unwrap_or(self.tokens.len());
        self.streak.reset();
        self.progress = 0.0;
        self.last_transcript = None;
        info!(
            tokens = self.tokens.len(),
            words = self.word_count(),
            policy = %self.policy,
            "Sequence rebuilt"
        );
    }

    pub fn set_policy(&mut self, policy: MatchPolicy) {
        self.policy = policy;
    }

    /// Feed the latest transcript. Returns `None` when the update was
    /// ignored: not listening, repeated transcript, nothing left to match or
    /// no spoken word.
    pub fn apply_transcript(&mut self, transcript: &str, listening: bool) -> Option<Transition> {
        if self.tokens.is_empty() || !listening {
            return None;
        }
        if self.last_transcript.as_deref() == Some(transcript) {
            trace!(transcript, "Ignoring repeated transcript");
            return None;
        }
        self.last_transcript = Some(transcript.to_string());

        let index = self.cursor;
        let target = self.tokens.get(index)?;
        if target.is_punctuation || target.status == WordStatus::Correct {
            return None;
        }
        if target.status == WordStatus::Incorrect && !self.retry_incorrect {
            return None;
        }
        let word = target.text.clone();

        let normalized = normalize(transcript);
        let heard = last_spoken_word(&normalized)?.to_string();

        let verdict = self.policy.judge(&word, &heard, &self.confusions);
        let confidence = verdict.confidence();
        let token = &mut self.tokens[index];
        token.confidence = confidence;

        let (outcome, feedback) = match verdict {
            Verdict::Accept { .. } => {
                token.status = WordStatus::Correct;
                let praise = self.streak.hit();
                self.advance_cursor();
                (Outcome::Correct, praise.then_some(FeedbackKind::Positive))
            }
            Verdict::Reject { .. } => {
                token.status = WordStatus::Incorrect;
                self.streak.miss();
                (Outcome::Incorrect, Some(FeedbackKind::Negative))
            }
            Verdict::Partial { .. } => {
                token.status = WordStatus::Current;
                (Outcome::InProgress, None)
            }
        };
        self.progress = progress(&self.tokens);

        debug!(
            index,
            word = %word,
            heard = %heard,
            ?outcome,
            confidence,
            streak = self.streak.current(),
            "Word judged"
        );

        Some(Transition {
            index,
            word,
            heard,
            outcome,
            confidence,
            feedback,
        })
    }

    /// Move past the accepted word, resolving punctuation on the way.
    fn advance_cursor(&mut self) {
        self.cursor += 1;
        while let Some(token) = self.tokens.get_mut(self.cursor) {
            if token.is_word() {
                token.status = WordStatus::Current;
                return;
            }
            token.status = WordStatus::Correct;
            token.confidence = 100.0;
            self.cursor += 1;
        }
        info!(words = self.word_count(), "Passage finished");
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the word awaiting a match, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.tokens
            .get(self.cursor)
            .filter(|t| t.is_word())
            .map(|_| self.cursor)
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn streak(&self) -> u32 {
        self.streak.current()
    }

    pub fn best_streak(&self) -> u32 {
        self.streak.best()
    }

    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_word()).count()
    }

    pub fn is_finished(&self) -> bool {
        self.word_count() > 0 && self.cursor >= self.tokens.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tokens: self.tokens.clone(),
            cursor: self.cursor(),
            progress: self.progress,
            streak: self.streak.current(),
            best_streak: self.streak.best(),
            finished: self.is_finished(),
        }
    }

    pub fn summary(&self) -> Summary {
        let words: Vec<&Token> = self.tokens.iter().filter(|t| t.is_word()).collect();
        let count = |status| words.iter().filter(|t| t.status == status).count();
        let resolved: Vec<f64> = words
            .iter()
            .filter(|t| matches!(t.status, WordStatus::Correct | WordStatus::Incorrect))
            .map(|t| t.confidence)
            .collect();

        Summary {
            words: words.len(),
            correct: count(WordStatus::Correct),
            incorrect: count(WordStatus::Incorrect),
            mean_confidence: mean(&resolved),
            best_streak: self.streak.best(),
        }
    }
}
