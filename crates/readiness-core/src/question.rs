use crate::error::{ReadinessError, Result};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position in catalog order. Assigned by the catalog on load.
    #[serde(default)]
    pub id: u32,
    pub category: Category,
    pub subcategory: String,
    pub text: String,
    pub options: Vec<String>,
    /// Point value for each entry of `options`, by position.
    pub scores: Vec<f64>,
    /// Display only. The real ceiling is [`Question::ceiling`].
    pub max_score: f64,
}

impl Question {
    /// Points awarded for `answer`, or `None` when the text is not one of
    /// this question's options. Matching is exact.
    pub fn score_for(&self, answer: &str) -> Option<f64> {
        let index = self.options.iter().position(|o| o == answer)?;
        self.scores.get(index).copied()
    }

    /// Highest attainable score for this question.
    pub fn ceiling(&self) -> f64 {
        self.scores.iter().copied().fold(0.0, f64::max)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(ReadinessError::InvalidCatalog(format!(
                "question {} ({}): {reason}",
                self.id, self.subcategory
            )))
        };

        if self.options.is_empty() {
            return fail("no answer options".to_string());
        }
        if self.options.len() != self.scores.len() {
            return fail(format!(
                "{} options but {} scores",
                self.options.len(),
                self.scores.len()
            ));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return fail(format!("duplicate option '{option}'"));
            }
        }
        if let Some(bad) = self.scores.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return fail(format!("invalid point value {bad}"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
