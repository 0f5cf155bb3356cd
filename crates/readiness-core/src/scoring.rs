//! Turns the responses of one assessment into capped category scores, a
//! total, and a readiness tier.
//!
//! Scoring is pure. Responses that point at an unknown question, or whose
//! answer text is not among the question's options, contribute nothing and
//! are only counted in [`ScoreCard::skipped`]. Every remaining response is
//! accumulated, duplicates included; each category is clamped to its cap once,
//! after accumulation, and the total is the sum of the clamped categories.

use crate::assessment::Response;
use crate::catalog::Catalog;
use crate::types::{Category, ReadinessLevel};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ScoreCard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Clamped score per category, indexed by [`Category::index`].
    pub categories: [f64; 4],
    pub total: f64,
    pub readiness: ReadinessLevel,
    /// Responses excluded for data-integrity reasons.
    #[serde(default)]
    pub skipped: usize,
}

impl ScoreCard {
    pub fn category(&self, category: Category) -> f64 {
        self.categories[category.index()]
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub fn score(catalog: &Catalog, responses: &[Response]) -> ScoreCard {
    let mut raw = [0.0f64; 4];
    let mut skipped = 0usize;

    for response in responses {
        let Some(question) = catalog.question(response.question_id) else {
            tracing::debug!(
                assessment = %response.assessment_id,
                question = response.question_id,
                "skipping response for unknown question"
            );
            skipped += 1;
            continue;
        };
        let Some(points) = question.score_for(&response.answer) else {
            tracing::debug!(
                assessment = %response.assessment_id,
                question = response.question_id,
                answer = %response.answer,
                "skipping response whose answer is not a question option"
            );
            skipped += 1;
            continue;
        };
        raw[question.category.index()] += points;
    }

    let mut categories = [0.0f64; 4];
    for &category in Category::all() {
        let i = category.index();
        categories[i] = raw[i].min(category.max_score());
    }
    let total: f64 = categories.iter().sum();

    ScoreCard {
        categories,
        total,
        readiness: ReadinessLevel::for_total(total),
        skipped,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Question;
    use uuid::Uuid;

    fn question(category: Category, options: &[&str], scores: &[f64]) -> Question {
        Question {
            id: 0,
            category,
            subcategory: "Test".to_string(),
            text: "Test?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            scores: scores.to_vec(),
            max_score: 5.0,
        }
    }

    fn one_strategy_question() -> Catalog {
        Catalog::new(
            1,
            vec![question(Category::Strategy, &["Yes", "No"], &[5.0, 0.0])],
        )
        .unwrap()
    }

    /// Builds a response without going through option validation so that
    /// integrity faults can be fed to the engine.
    fn raw_response(question_id: u32, answer: &str) -> Response {
        Response {
            assessment_id: Uuid::nil(),
            question_id,
            answer: answer.to_string(),
            score: None,
        }
    }

    /// Five questions per category, each worth up to 5 points.
    fn wide_catalog() -> Catalog {
        let mut questions = Vec::new();
        for &c in Category::all() {
            for _ in 0..5 {
                questions.push(question(c, &["High", "Mid", "Low"], &[5.0, 3.0, 0.0]));
            }
        }
        Catalog::new(1, questions).unwrap()
    }

    #[test]
    fn single_yes_scores_five() {
        let catalog = one_strategy_question();
        let card = score(&catalog, &[raw_response(1, "Yes")]);
        assert_eq!(card.category(Category::Strategy), 5.0);
        assert_eq!(card.category(Category::Governance), 0.0);
        assert_eq!(card.category(Category::DataInfrastructure), 0.0);
        assert_eq!(card.category(Category::Organization), 0.0);
        assert_eq!(card.total, 5.0);
        assert_eq!(card.readiness, ReadinessLevel::Novice);
        assert_eq!(card.skipped, 0);
    }

    #[test]
    fn duplicate_responses_are_both_counted() {
        let catalog = one_strategy_question();
        let card = score(&catalog, &[raw_response(1, "Yes"), raw_response(1, "Yes")]);
        assert_eq!(card.category(Category::Strategy), 10.0);
        assert_eq!(card.total, 10.0);
    }

    #[test]
    fn unmatched_answer_contributes_nothing() {
        let catalog = one_strategy_question();
        let card = score(&catalog, &[raw_response(1, "Perhaps")]);
        assert_eq!(card.total, 0.0);
        assert_eq!(card.skipped, 1);
    }

    #[test]
    fn unknown_question_is_skipped() {
        let catalog = one_strategy_question();
        let card = score(&catalog, &[raw_response(42, "Yes"), raw_response(1, "Yes")]);
        assert_eq!(card.total, 5.0);
        assert_eq!(card.skipped, 1);
    }

    #[test]
    fn empty_response_set_scores_zero() {
        let card = score(&wide_catalog(), &[]);
        assert_eq!(card.categories, [0.0; 4]);
        assert_eq!(card.total, 0.0);
        assert_eq!(card.readiness, ReadinessLevel::Novice);
    }

    #[test]
    fn clamp_is_exact_when_over_cap() {
        let catalog = wide_catalog();
        // All 20 questions answered "High": 25 raw per category.
        let responses: Vec<Response> = (1..=20).map(|id| raw_response(id, "High")).collect();
        let card = score(&catalog, &responses);
        for &c in Category::all() {
            assert_eq!(card.category(c), c.max_score());
        }
        assert_eq!(card.total, 73.0);
        assert_eq!(card.readiness, ReadinessLevel::Advanced);
    }

    #[test]
    fn clamp_is_noop_below_cap() {
        let catalog = wide_catalog();
        // Three "Mid" answers per category: 9 raw, below every cap.
        let responses: Vec<Response> = Category::all()
            .iter()
            .enumerate()
            .flat_map(|(ci, _)| (0..3).map(move |k| raw_response((ci * 5 + k + 1) as u32, "Mid")))
            .collect();
        let card = score(&catalog, &responses);
        assert_eq!(card.categories, [9.0; 4]);
        assert_eq!(card.total, 36.0);
        assert_eq!(card.readiness, ReadinessLevel::Ready);
    }

    #[test]
    fn clamp_applies_after_accumulation_not_per_response() {
        // Governance: four "High" (20 raw) then one "Low" (0) -> clamped to 17.
        let catalog = wide_catalog();
        let responses: Vec<Response> = (6..=10)
            .map(|id| raw_response(id, if id == 10 { "Low" } else { "High" }))
            .collect();
        let card = score(&catalog, &responses);
        assert_eq!(card.category(Category::Governance), 17.0);
        assert_eq!(card.total, 17.0);
    }

    #[test]
    fn scores_stay_within_bounds_for_any_subset() {
        let catalog = wide_catalog();
        let answers = ["High", "Mid", "Low", "bogus"];
        // Walk a deterministic spread of answer combinations.
        for seed in 0..64u32 {
            let responses: Vec<Response> = (1..=20)
                .filter(|id| (id + seed) % 3 != 0)
                .map(|id| raw_response(id, answers[((id * 7 + seed) % 4) as usize]))
                .collect();
            let card = score(&catalog, &responses);
            for &c in Category::all() {
                let v = card.category(c);
                assert!((0.0..=c.max_score()).contains(&v), "{c}: {v}");
            }
            assert!((0.0..=73.0).contains(&card.total));
            assert_eq!(card.readiness, ReadinessLevel::for_total(card.total));
        }
    }

    #[test]
    fn same_total_from_different_splits_gets_same_label() {
        let catalog = wide_catalog();
        // 15 in strategy + 15 in governance vs. 10 in each of three categories.
        let a: Vec<Response> = [1, 2, 3, 6, 7, 8].iter().map(|&id| raw_response(id, "High")).collect();
        let b: Vec<Response> = [1, 2, 6, 7, 11, 12].iter().map(|&id| raw_response(id, "High")).collect();
        let ca = score(&catalog, &a);
        let cb = score(&catalog, &b);
        assert_eq!(ca.total, 30.0);
        assert_eq!(cb.total, 30.0);
        assert_ne!(ca.categories, cb.categories);
        assert_eq!(ca.readiness, cb.readiness);
    }
}
