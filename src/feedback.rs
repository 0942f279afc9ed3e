use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::{Duration, Instant};

pub const DEFAULT_DISPLAY_MS: u64 = 2000;

const POSITIVE: [&str; 6] = [
    "Great job!",
    "You're on a roll!",
    "Excellent reading!",
    "Keep it up!",
    "Fantastic!",
    "Nicely done!",
];

const NEGATIVE: [&str; 5] = [
    "Try that word again.",
    "Almost! Look closely.",
    "Take your time.",
    "Sound it out slowly.",
    "Not quite, keep going.",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Negative,
}

/// A message on screen until `expires_at`.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    pub shown_at: Instant,
    pub expires_at: Instant,
}

impl Feedback {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Picks feedback messages uniformly at random from fixed pools.
#[derive(Debug)]
pub struct FeedbackSelector<R = StdRng> {
    rng: R,
    positive: Vec<String>,
    negative: Vec<String>,
    display_for: Duration,
}

impl FeedbackSelector<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for FeedbackSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FeedbackSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            positive: POSITIVE.iter().map(|s| s.to_string()).collect(),
            negative: NEGATIVE.iter().map(|s| s.to_string()).collect(),
            display_for: Duration::from_millis(DEFAULT_DISPLAY_MS),
        }
    }

    pub fn display_for(mut self, duration: Duration) -> Self {
        self.display_for = duration;
        self
    }

    pub fn pick(&mut self, kind: FeedbackKind, now: Instant) -> Feedback {
        let pool = match kind {
            FeedbackKind::Positive => &self.positive,
            FeedbackKind::Negative => &self.negative,
        };
        let message = pool.choose(&mut self.rng).cloned().unwrap_or_default();

        Feedback {
            kind,
            message,
            shown_at: now,
            expires_at: now + self.display_for,
        }
    }
}

/// Holds at most one visible feedback message.
#[derive(Clone, Debug, Default)]
pub struct FeedbackBanner {
    current: Option<Feedback>,
}

impl FeedbackBanner {
    pub fn show(&mut self, feedback: Feedback) {
        self.current = Some(feedback);
    }

    /// Dismiss the message once its display time has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|f| f.is_expired(now)) {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Feedback> {
        self.current.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|f| f.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> FeedbackSelector<StdRng> {
        FeedbackSelector::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn picks_from_matching_pool() {
        let mut selector = seeded(7);
        let now = Instant::now();
        for _ in 0..20 {
            let f = selector.pick(FeedbackKind::Positive, now);
            assert!(POSITIVE.contains(&f.message.as_str()));
            let f = selector.pick(FeedbackKind::Negative, now);
            assert!(NEGATIVE.contains(&f.message.as_str()));
        }
    }

    #[test]
    fn seeded_selection_is_deterministic() {
        let now = Instant::now();
        let a: Vec<String> = {
            let mut s = seeded(42);
            (0..10).map(|_| s.pick(FeedbackKind::Positive, now).message).collect()
        };
        let b: Vec<String> = {
            let mut s = seeded(42);
            (0..10).map(|_| s.pick(FeedbackKind::Positive, now).message).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn banner_dismisses_after_display_time() {
        let mut selector = seeded(3).display_for(Duration::from_millis(2000));
        let mut banner = FeedbackBanner::default();
        let start = Instant::now();

        banner.show(selector.pick(FeedbackKind::Negative, start));
        assert!(banner.is_visible());

        banner.tick(start + Duration::from_millis(1999));
        assert!(banner.is_visible());

        banner.tick(start + Duration::from_millis(2000));
        assert!(!banner.is_visible());
        assert_eq!(banner.message(), None);
    }

    #[test]
    fn newer_message_replaces_older() {
        let mut selector = seeded(9);
        let mut banner = FeedbackBanner::default();
        let now = Instant::now();

        banner.show(selector.pick(FeedbackKind::Positive, now));
        let latest = selector.pick(FeedbackKind::Negative, now);
        let message = latest.message.clone();
        banner.show(latest);
        assert_eq!(banner.message(), Some(message.as_str()));
        assert_eq!(banner.current().map(|f| f.kind), Some(FeedbackKind::Negative));
    }
}
