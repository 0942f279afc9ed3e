use serde::Deserialize;

use super::{Difficulty, TextProvider};
use crate::assets::read_locale_asset;
use crate::error::Result;

/// Bundled passages for one locale, grouped by difficulty.
#[derive(Deserialize, Clone, Debug)]
pub struct PassageLibrary {
    pub name: String,
    #[serde(default)]
    easy: Vec<String>,
    #[serde(default)]
    medium: Vec<String>,
    #[serde(default)]
    hard: Vec<String>,
}

impl PassageLibrary {
    pub fn load(locale: &str) -> Result<Self> {
        Self::from_json(read_locale_asset("passages", locale)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn pool(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl TextProvider for PassageLibrary {
    fn passage(&self, difficulty: Difficulty, index: usize) -> Option<&str> {
        self.pool(difficulty).get(index).map(String::as_str)
    }

    fn passage_count(&self, difficulty: Difficulty) -> usize {
        self.pool(difficulty).len()
    }
}
