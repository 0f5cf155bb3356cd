use crate::assessment::Assessment;
use crate::types::{Category, ReadinessLevel};
use serde::Serialize;
use std::fmt::Write as _;
use uuid::Uuid;

pub const REPORT_TITLE: &str = "AI Readiness Assessment Report";

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub category: Category,
    pub label: &'static str,
    pub score: f64,
}

/// Everything a rendered readiness report shows, independent of format.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub assessment_id: Uuid,
    pub title: &'static str,
    pub total_score: f64,
    pub readiness_level: Option<ReadinessLevel>,
    pub rows: Vec<ReportRow>,
    pub recommendations: Vec<&'static str>,
}

impl Report {
    pub fn from_assessment(assessment: &Assessment) -> Self {
        let rows: Vec<ReportRow> = Category::all()
            .iter()
            .map(|&category| ReportRow {
                category,
                label: category.report_label(),
                score: assessment.category_score(category),
            })
            .collect();

        let recommendations = rows
            .iter()
            .filter(|r| r.score < r.category.recommendation_threshold())
            .map(|r| r.category.recommendation())
            .collect();

        Self {
            assessment_id: assessment.id,
            title: REPORT_TITLE,
            total_score: assessment.total_score,
            readiness_level: assessment.readiness_level,
            rows,
            recommendations,
        }
    }

    pub fn file_name(&self) -> String {
        format!("AI_Readiness_Report_{}.pdf", self.assessment_id)
    }

    pub fn readiness_label(&self) -> &'static str {
        self.readiness_level.map(|l| l.as_str()).unwrap_or("Pending")
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "## Summary\n");
        let _ = writeln!(out, "- Total Score: {}", format_score(self.total_score));
        let _ = writeln!(out, "- Readiness Level: {}\n", self.readiness_label());
        let _ = writeln!(out, "| Category | Score |");
        let _ = writeln!(out, "|---|---|");
        for row in &self.rows {
            let _ = writeln!(out, "| {} | {} |", row.label, format_score(row.score));
        }
        let _ = writeln!(out, "\n## Recommendations\n");
        if self.recommendations.is_empty() {
            let _ = writeln!(out, "No recommendations: every category meets its target.");
        }
        for rec in &self.recommendations {
            let _ = writeln!(out, "- {rec}");
        }
        out
    }
}

/// Whole scores print without a fractional part.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
