use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Config;
use crate::confusion::ConfusionTable;
use crate::feedback::{FeedbackBanner, FeedbackSelector};
use crate::matching_policy::MatchPolicy;
use crate::passages::{Difficulty, TextProvider};
use crate::recital::{Recital, Snapshot, Transition};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub passage_index: usize,
    pub strict_difficulty: Difficulty,
    pub feedback_duration: Duration,
    pub retry_incorrect: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            difficulty: cfg.difficulty,
            passage_index: 0,
            strict_difficulty: cfg.strict_difficulty,
            feedback_duration: Duration::from_millis(cfg.feedback_ms),
            retry_incorrect: cfg.retry_incorrect,
        }
    }
}

impl SessionConfig {
    pub fn policy(&self) -> MatchPolicy {
        if self.difficulty == self.strict_difficulty {
            MatchPolicy::Strict
        } else {
            MatchPolicy::Flexible
        }
    }
}

/// Everything the presentation layer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub difficulty: Difficulty,
    pub passage_index: usize,
    pub policy: MatchPolicy,
    pub feedback: Option<String>,
    #[serde(flatten)]
    pub recital: Snapshot,
}

/// Owns the text provider, the recital and the feedback banner, and
/// exposes the control surface a host drives.
#[derive(Debug)]
pub struct Session<P, R = StdRng> {
    provider: P,
    config: SessionConfig,
    recital: Recital,
    selector: FeedbackSelector<R>,
    banner: FeedbackBanner,
}

impl<P: TextProvider> Session<P, StdRng> {
    pub fn new(provider: P, config: SessionConfig, confusions: ConfusionTable) -> Self {
        let selector = FeedbackSelector::new();
        Self::with_selector(provider, config, confusions, selector)
    }
}

impl<P: TextProvider, R: Rng> Session<P, R> {
    pub fn with_selector(
        provider: P,
        config: SessionConfig,
        confusions: ConfusionTable,
        selector: FeedbackSelector<R>,
    ) -> Self {
        let recital =
            Recital::new(config.policy(), confusions).retry_incorrect(config.retry_incorrect);
        let selector = selector.display_for(config.feedback_duration);
        let mut session = Self {
            provider,
            config,
            recital,
            selector,
            banner: FeedbackBanner::default(),
        };
        session.load_reference();
        session
    }

    fn load_reference(&mut self) {
        let (difficulty, index) = (self.config.difficulty, self.config.passage_index);
        let text = self.provider.passage(difficulty, index).unwrap_or_default();
        info!(%difficulty, index, "Loading passage");
        self.recital.set_policy(self.config.policy());
        self.recital.apply_reference_text(text);
        self.banner.clear();
    }

    /// Start the current passage over.
    pub fn reset(&mut self) {
        self.load_reference();
    }

    /// Move to the next passage in rotation for the current difficulty.
    pub fn advance_reference(&mut self) {
        self.config.passage_index = self
            .provider
            .next_index(self.config.difficulty, self.config.passage_index);
        self.load_reference();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        self.config.passage_index = 0;
        self.load_reference();
    }

    /// Feed the speech source's latest transcript; shows feedback when the
    /// transition calls for it.
    pub fn apply_transcript(
        &mut self,
        transcript: &str,
        listening: bool,
        now: Instant,
    ) -> Option<Transition> {
        let transition = self.recital.apply_transcript(transcript, listening)?;
        if let Some(kind) = transition.feedback {
            let feedback = self.selector.pick(kind, now);
            debug!(?kind, message = %feedback.message, "Showing feedback");
            self.banner.show(feedback);
        }
        Some(transition)
    }

    /// Dismiss expired feedback.
    pub fn tick(&mut self, now: Instant) {
        self.banner.tick(now);
    }

    pub fn recital(&self) -> &Recital {
        &self.recital
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn passage_index(&self) -> usize {
        self.config.passage_index
    }

    pub fn policy(&self) -> MatchPolicy {
        self.recital.policy()
    }

    pub fn feedback(&self) -> &FeedbackBanner {
        &self.banner
    }

    pub fn is_finished(&self) -> bool {
        self.recital.is_finished()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            difficulty: self.config.difficulty,
            passage_index: self.config.passage_index,
            policy: self.recital.policy(),
            feedback: self.banner.message().map(str::to_string),
            recital: self.recital.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackKind;
    use crate::passages::PassageLibrary;
    use crate::tokenizer::WordStatus;
    use rand::SeedableRng;

    fn library() -> PassageLibrary {
        PassageLibrary::from_json(
            r#"{
                "name": "test",
                "easy": ["The cat sat.", "A big dog."],
                "medium": ["There is a fox."],
                "hard": ["Exact words only."]
            }"#,
        )
        .unwrap()
    }

    fn session() -> Session<PassageLibrary> {
        let selector = FeedbackSelector::with_rng(StdRng::seed_from_u64(11));
        Session::with_selector(
            library(),
            SessionConfig::default(),
            ConfusionTable::for_locale("english").unwrap(),
            selector,
        )
    }

    #[test]
    fn starts_on_first_easy_passage() {
        let s = session();
        assert_eq!(s.difficulty(), Difficulty::Easy);
        assert_eq!(s.passage_index(), 0);
        assert_eq!(s.policy(), MatchPolicy::Flexible);
        assert_eq!(s.recital().reference(), "The cat sat.");
        assert_eq!(s.recital().cursor(), Some(0));
    }

    #[test]
    fn strict_level_follows_config() {
        let config = SessionConfig {
            strict_difficulty: Difficulty::Easy,
            ..SessionConfig::default()
        };
        assert_eq!(config.policy(), MatchPolicy::Strict);
        let config = SessionConfig {
            difficulty: Difficulty::Hard,
            ..config
        };
        assert_eq!(config.policy(), MatchPolicy::Flexible);
    }

    #[test]
    fn advance_rotates_and_resets() {
        let mut s = session();
        let now = Instant::now();
        s.apply_transcript("the", true, now);
        s.advance_reference();
        assert_eq!(s.passage_index(), 1);
        assert_eq!(s.recital().reference(), "A big dog.");
        assert_eq!(s.recital().streak(), 0);

        s.advance_reference();
        assert_eq!(s.passage_index(), 0);
    }

    #[test]
    fn difficulty_change_switches_policy_and_passage() {
        let mut s = session();
        s.set_difficulty(Difficulty::Hard);
        assert_eq!(s.policy(), MatchPolicy::Strict);
        assert_eq!(s.passage_index(), 0);
        assert_eq!(s.recital().reference(), "Exact words only.");

        s.set_difficulty(Difficulty::Medium);
        assert_eq!(s.policy(), MatchPolicy::Flexible);
    }

    #[test]
    fn negative_feedback_shows_and_expires() {
        let mut s = session();
        let now = Instant::now();
        let t = s.apply_transcript("dog", true, now).unwrap();
        assert_eq!(t.feedback, Some(FeedbackKind::Negative));
        assert!(s.feedback().is_visible());
        assert!(s.snapshot().feedback.is_some());

        s.tick(now + Duration::from_millis(1000));
        assert!(s.feedback().is_visible());
        s.tick(now + Duration::from_millis(2000));
        assert!(!s.feedback().is_visible());
    }

    #[test]
    fn positive_feedback_only_on_third_hit() {
        let mut s = session();
        s.set_difficulty(Difficulty::Medium);
        let now = Instant::now();

        s.apply_transcript("there", true, now);
        assert!(!s.feedback().is_visible());
        s.apply_transcript("there is", true, now);
        assert!(!s.feedback().is_visible());
        s.apply_transcript("there is a", true, now);
        assert!(s.feedback().is_visible());
        assert_eq!(
            s.feedback().current().map(|f| f.kind),
            Some(FeedbackKind::Positive)
        );
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut s = session();
        let now = Instant::now();
        s.apply_transcript("the", true, now);
        s.apply_transcript("the cap", true, now);
        s.apply_transcript("the cap mat", true, now);
        assert!(s.recital().progress() > 0.0);

        s.reset();
        let snap = s.snapshot();
        assert_eq!(snap.recital.streak, 0);
        assert_eq!(snap.recital.progress, 0.0);
        assert_eq!(snap.recital.cursor, Some(0));
        assert_eq!(snap.feedback, None);
        assert_eq!(snap.recital.tokens[0].status, WordStatus::Current);
        assert!(snap.recital.tokens[1..]
            .iter()
            .all(|t| t.status == WordStatus::Waiting));
    }

    #[test]
    fn snapshot_serializes_flat() {
        let s = session();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["policy"], "flexible");
        assert_eq!(json["tokens"][0]["text"], "the");
        assert_eq!(json["tokens"][0]["status"], "current");
        assert_eq!(json["progress"], 0.0);
    }

    #[test]
    fn missing_passage_gives_empty_sequence() {
        let lib = PassageLibrary::from_json(r#"{"name": "empty"}"#).unwrap();
        let mut s = Session::new(lib, SessionConfig::default(), ConfusionTable::empty());
        assert!(s.recital().tokens().is_empty());
        assert!(s.apply_transcript("hello", true, Instant::now()).is_none());
        s.advance_reference();
        assert_eq!(s.passage_index(), 0);
    }
}
