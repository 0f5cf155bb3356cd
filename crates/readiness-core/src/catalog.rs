//! The fixed, ordered questionnaire every assessment is taken against.
//!
//! A [`Catalog`] is built once (from the embedded `catalog.yaml` or a custom
//! file named in config), validated, and then shared read-only for the life
//! of the process. Question ids are assigned from list order, starting at 1,
//! so the id doubles as the assessment cursor position.

use crate::error::{ReadinessError, Result};
use crate::question::Question;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_version")]
    version: u32,
    questions: Vec<Question>,
}

fn default_version() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub version: u32,
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog from questions in presentation order.
    ///
    /// Ids are reassigned from position; every question is validated and the
    /// first structural fault is returned.
    pub fn new(version: u32, mut questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(ReadinessError::InvalidCatalog(
                "catalog has no questions".to_string(),
            ));
        }
        for (i, q) in questions.iter_mut().enumerate() {
            q.id = i as u32 + 1;
            q.validate()?;
        }
        Ok(Self { version, questions })
    }

    /// The questionnaire shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(data)?;
        Self::new(file.version, file.questions)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml(&data)?;
        tracing::debug!(
            path = %path.display(),
            questions = catalog.len(),
            "loaded custom catalog"
        );
        Ok(catalog)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: u32) -> Option<&Question> {
        let index = (id as usize).checked_sub(1)?;
        self.questions.get(index)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.category == category)
    }

    /// Questions shown at 1-based `cursor`, at most `page_size` of them.
    /// Empty once the cursor has passed the last question.
    pub fn page(&self, cursor: u32, page_size: usize) -> &[Question] {
        let start = (cursor.max(1) - 1) as usize;
        if start >= self.questions.len() {
            return &[];
        }
        let end = (start + page_size).min(self.questions.len());
        &self.questions[start..end]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
