use crate::output::{print_json, print_table};
use clap::Subcommand;
use readiness_core::assessment::Assessment;
use readiness_core::report::format_score;
use readiness_core::types::Category;
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AssessmentSubcommand {
    /// List all assessments, newest first
    List,

    /// Show one assessment with its recorded responses
    Show {
        /// Assessment id
        id: Uuid,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: AssessmentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AssessmentSubcommand::List => list(root, json),
        AssessmentSubcommand::Show { id } => show(root, id, json),
    }
}

fn level_label(a: &Assessment) -> String {
    a.readiness_level
        .map(|l| l.to_string())
        .unwrap_or_else(|| "-".to_string())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let assessments = store.list_assessments()?;

    if json {
        return print_json(&assessments);
    }
    if assessments.is_empty() {
        println!("No assessments.");
        return Ok(());
    }

    let rows = assessments
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.status.to_string(),
                a.start_date.format("%Y-%m-%d %H:%M").to_string(),
                format_score(a.total_score),
                level_label(a),
            ]
        })
        .collect();
    print_table(&["ID", "STATUS", "STARTED", "TOTAL", "LEVEL"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, id: Uuid, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let catalog = super::load_catalog(root)?;
    let assessment = store.assessment(id)?;
    let responses = store.responses(id)?;

    if json {
        return print_json(&serde_json::json!({
            "assessment": assessment,
            "responses": responses,
        }));
    }

    println!("Assessment: {}", assessment.id);
    println!("User:       {}", assessment.user_id);
    println!("Status:     {}", assessment.status);
    println!(
        "Progress:   {}/{} questions",
        (assessment.current_question.max(1) - 1).min(catalog.len() as u32),
        catalog.len()
    );
    if assessment.is_complete() {
        for &c in Category::all() {
            println!(
                "  {:<22} {}",
                c.display_name(),
                format_score(assessment.category_score(c))
            );
        }
        println!("Total:      {}", format_score(assessment.total_score));
        println!("Readiness:  {}", level_label(&assessment));
    }

    if !responses.is_empty() {
        println!();
        let rows = responses
            .iter()
            .map(|r| {
                vec![
                    r.question_id.to_string(),
                    r.score.map(format_score).unwrap_or_else(|| "-".to_string()),
                    r.answer.clone(),
                ]
            })
            .collect();
        print_table(&["Q", "POINTS", "ANSWER"], rows);
    }
    Ok(())
}
