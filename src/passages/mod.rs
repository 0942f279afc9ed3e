pub mod difficulty;
pub mod library;
pub mod provider;

// Re-export the main types for convenience
pub use difficulty::Difficulty;
pub use library::PassageLibrary;
pub use provider::{SinglePassage, TextProvider};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recital::Recital;
    use crate::{confusion::ConfusionTable, matching_policy::MatchPolicy};

    #[test]
    fn every_bundled_passage_builds_a_readable_sequence() {
        let library = PassageLibrary::load("english").unwrap();
        for difficulty in Difficulty::ALL {
            for idx in 0..library.passage_count(difficulty) {
                let text = library.passage(difficulty, idx).unwrap();
                let recital =
                    Recital::new(MatchPolicy::Flexible, ConfusionTable::empty()).with_reference(text);
                assert!(recital.word_count() > 0, "{difficulty} #{idx} has no words");
                assert_eq!(recital.cursor(), Some(0));
            }
        }
    }
}
