use super::Difficulty;

/// Source of reference passages, addressed by difficulty and index.
pub trait TextProvider {
    fn passage(&self, difficulty: Difficulty, index: usize) -> Option<&str>;

    fn passage_count(&self, difficulty: Difficulty) -> usize;

    /// Index after `index` in the rotation for `difficulty`, wrapping around.
    fn next_index(&self, difficulty: Difficulty, index: usize) -> usize {
        match self.passage_count(difficulty) {
            0 => 0,
            count => (index + 1) % count,
        }
    }
}

impl<T: TextProvider + ?Sized> TextProvider for Box<T> {
    fn passage(&self, difficulty: Difficulty, index: usize) -> Option<&str> {
        (**self).passage(difficulty, index)
    }

    fn passage_count(&self, difficulty: Difficulty) -> usize {
        (**self).passage_count(difficulty)
    }
}

/// A single user-supplied passage, served at index 0 for every difficulty.
#[derive(Debug, Clone)]
pub struct SinglePassage {
    text: String,
}

impl SinglePassage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextProvider for SinglePassage {
    fn passage(&self, _difficulty: Difficulty, index: usize) -> Option<&str> {
        (index == 0).then_some(self.text.as_str())
    }

    fn passage_count(&self, _difficulty: Difficulty) -> usize {
        1
    }
}
