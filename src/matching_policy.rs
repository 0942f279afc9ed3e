use serde::{Deserialize, Serialize};

use crate::confusion::ConfusionTable;
use crate::distance::edit_distance;

/// Confidence lost per edit.
pub const CONFIDENCE_PER_EDIT: f64 = 33.33;
/// Largest edit distance still accepted by the flexible policy.
pub const MAX_ACCEPTED_DISTANCE: usize = 1;

/// How a spoken word is judged against the target word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchPolicy {
    /// Exact equality only; a mismatch is final.
    Strict,
    /// Edit distance 1 or a confusion alternate; short utterances are partial.
    Flexible,
}

/// Result of judging one spoken word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Accept { confidence: f64 },
    Reject { confidence: f64 },
    Partial { confidence: f64 },
}

impl Verdict {
    pub fn confidence(&self) -> f64 {
        match *self {
            Verdict::Accept { confidence }
            | Verdict::Reject { confidence }
            | Verdict::Partial { confidence } => confidence,
        }
    }
}

pub fn distance_confidence(distance: usize) -> f64 {
    (100.0 - distance as f64 * CONFIDENCE_PER_EDIT).clamp(0.0, 100.0)
}

impl MatchPolicy {
    /// Whether a still-growing utterance can be judged as partial.
    pub fn tolerates_partials(&self) -> bool {
        matches!(self, MatchPolicy::Flexible)
    }

    pub fn judge(&self, target: &str, spoken: &str, confusions: &ConfusionTable) -> Verdict {
        match self {
            MatchPolicy::Strict => judge_strict(target, spoken),
            MatchPolicy::Flexible => judge_flexible(target, spoken, confusions),
        }
    }
}

fn judge_strict(target: &str, spoken: &str) -> Verdict {
    if target == spoken {
        Verdict::Accept { confidence: 100.0 }
    } else {
        Verdict::Reject { confidence: 0.0 }
    }
}

fn judge_flexible(target: &str, spoken: &str, confusions: &ConfusionTable) -> Verdict {
    let distance = edit_distance(target, spoken);

    if confusions.is_confusion(target, spoken) {
        return Verdict::Accept { confidence: 100.0 };
    }

    let confidence = distance_confidence(distance);
    if distance <= MAX_ACCEPTED_DISTANCE {
        Verdict::Accept { confidence }
    } else if spoken.chars().count() >= target.chars().count() {
        Verdict::Reject { confidence }
    } else {
        Verdict::Partial { confidence }
    }
}
