use crate::catalog::Catalog;
use crate::error::{ReadinessError, Result};
use crate::question::Question;
use crate::scoring::ScoreCard;
use crate::types::{AssessmentStatus, Category, ReadinessLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Questions shown per page when config does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// One answer to one catalog question within an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub assessment_id: Uuid,
    pub question_id: u32,
    /// The selected option label, verbatim.
    pub answer: String,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Response {
    /// Record `answer` for `question`, rejecting text that is not one of the
    /// question's options.
    pub fn new(assessment_id: Uuid, question: &Question, answer: impl Into<String>) -> Result<Self> {
        let answer = answer.into();
        let score = question
            .score_for(&answer)
            .ok_or_else(|| ReadinessError::InvalidAnswer {
                question: question.id,
                answer: answer.clone(),
            })?;
        Ok(Self {
            assessment_id,
            question_id: question.id,
            answer,
            score: Some(score),
        })
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    /// 1-based position of the next unanswered question.
    pub current_question: u32,
    pub status: AssessmentStatus,
    #[serde(default)]
    pub strategy_score: f64,
    #[serde(default)]
    pub governance_score: f64,
    #[serde(default)]
    pub data_infrastructure_score: f64,
    #[serde(default)]
    pub organization_score: f64,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_level: Option<ReadinessLevel>,
}

impl Assessment {
    pub fn start(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            start_date: now,
            completion_date: None,
            current_question: 1,
            status: AssessmentStatus::InProgress,
            strategy_score: 0.0,
            governance_score: 0.0,
            data_infrastructure_score: 0.0,
            organization_score: 0.0,
            total_score: 0.0,
            readiness_level: None,
        }
    }

    pub fn owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_complete(&self) -> bool {
        self.status == AssessmentStatus::Complete
    }

    /// True once the cursor has moved past the last catalog question.
    pub fn is_exhausted(&self, catalog: &Catalog) -> bool {
        (self.current_question.max(1) - 1) as usize >= catalog.len()
    }

    /// The questions waiting at the cursor.
    pub fn page<'c>(&self, catalog: &'c Catalog, page_size: usize) -> &'c [Question] {
        catalog.page(self.current_question, page_size)
    }

    pub fn advance(&mut self, shown: usize) {
        self.current_question += shown as u32;
    }

    /// Accept answers for the current page and move the cursor past it.
    ///
    /// Questions left blank produce no response. Answers keyed to questions
    /// outside the current page are ignored. An answer that is not one of its
    /// question's options rejects the whole page and leaves the cursor alone.
    pub fn submit_page(
        &mut self,
        catalog: &Catalog,
        page_size: usize,
        answers: &BTreeMap<u32, String>,
    ) -> Result<Vec<Response>> {
        if self.is_complete() {
            return Err(ReadinessError::InvalidState(format!(
                "assessment {} is already complete",
                self.id
            )));
        }
        let page = self.page(catalog, page_size);
        if page.is_empty() {
            return Err(ReadinessError::InvalidState(format!(
                "assessment {} has no questions left to answer",
                self.id
            )));
        }

        let mut responses = Vec::with_capacity(page.len());
        for question in page {
            match answers.get(&question.id) {
                Some(answer) if !answer.is_empty() => {
                    responses.push(Response::new(self.id, question, answer.as_str())?);
                }
                _ => {}
            }
        }

        self.advance(page.len());
        Ok(responses)
    }

    /// Write a score card into the record and mark it complete.
    ///
    /// Returns `false` without touching anything if the assessment was
    /// already complete.
    pub fn finalize(&mut self, card: &ScoreCard, now: DateTime<Utc>) -> bool {
        if self.is_complete() {
            return false;
        }
        self.strategy_score = card.category(Category::Strategy);
        self.governance_score = card.category(Category::Governance);
        self.data_infrastructure_score = card.category(Category::DataInfrastructure);
        self.organization_score = card.category(Category::Organization);
        self.total_score = card.total;
        self.readiness_level = Some(card.readiness);
        self.status = AssessmentStatus::Complete;
        self.completion_date = Some(now);
        true
    }

    pub fn category_score(&self, category: Category) -> f64 {
        match category {
            Category::Strategy => self.strategy_score,
            Category::Governance => self.governance_score,
            Category::DataInfrastructure => self.data_infrastructure_score,
            Category::Organization => self.organization_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
