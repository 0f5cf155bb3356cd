use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Utc;
use readiness_core::assessment::{Assessment, Response};
use readiness_core::report::{format_score, Report};
use readiness_core::scoring;
use readiness_core::types::Category;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// Score an answers file (`question id: answer`, YAML or JSON) without
/// touching the database.
pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let catalog = super::load_catalog(root)?;
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let raw: BTreeMap<String, String> = serde_yaml::from_str(&data)
        .with_context(|| format!("{} is not a map of question id to answer", file.display()))?;

    // Scratch assessment: the engine only needs an id to tag responses with.
    let mut scratch = Assessment::start(Uuid::nil(), Utc::now());
    let mut responses = Vec::with_capacity(raw.len());
    for (key, answer) in raw {
        let question_id: u32 = key
            .trim()
            .parse()
            .with_context(|| format!("invalid question id '{key}'"))?;
        responses.push(Response {
            assessment_id: scratch.id,
            question_id,
            answer,
            score: None,
        });
    }

    let card = scoring::score(&catalog, &responses);
    scratch.finalize(&card, Utc::now());
    let report = Report::from_assessment(&scratch);

    if json {
        let categories: serde_json::Map<String, serde_json::Value> = Category::all()
            .iter()
            .map(|&c| (c.as_str().to_string(), serde_json::json!(card.category(c))))
            .collect();
        return print_json(&serde_json::json!({
            "categories": categories,
            "total_score": card.total,
            "readiness_level": card.readiness,
            "skipped": card.skipped,
            "recommendations": report.recommendations,
        }));
    }

    let rows = Category::all()
        .iter()
        .map(|&c| {
            vec![
                c.display_name().to_string(),
                format_score(card.category(c)),
                format_score(c.max_score()),
            ]
        })
        .collect();
    print_table(&["CATEGORY", "SCORE", "MAX"], rows);
    println!();
    println!("Total:     {}", format_score(card.total));
    println!("Readiness: {}", card.readiness);
    if card.skipped > 0 {
        println!("Skipped:   {} response(s) not matching the catalog", card.skipped);
    }
    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
    Ok(())
}
