use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use readiness_core::catalog::Catalog;
use readiness_core::config::WarnLevel;
use readiness_core::report::format_score;
use readiness_core::types::Category;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// List the questions in presentation order
    List {
        /// Only show one category (strategy, governance, data_infrastructure, organization)
        #[arg(long)]
        category: Option<String>,
    },

    /// Check a catalog file, or the project's configured catalog
    Validate {
        /// Catalog YAML to check (defaults to the configured catalog)
        path: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: CatalogSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CatalogSubcommand::List { category } => list(root, category.as_deref(), json),
        CatalogSubcommand::Validate { path } => validate(root, path.as_deref(), json),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let catalog = super::load_catalog(root)?;
    let filter = category.map(|c| c.parse::<Category>()).transpose()?;

    let questions: Vec<_> = catalog
        .questions()
        .iter()
        .filter(|q| filter.map_or(true, |c| q.category == c))
        .collect();

    if json {
        return print_json(&questions);
    }

    let rows = questions
        .iter()
        .map(|q| {
            vec![
                q.id.to_string(),
                q.category.display_name().to_string(),
                q.subcategory.clone(),
                q.options.len().to_string(),
                format_score(q.ceiling()),
            ]
        })
        .collect();
    print_table(&["ID", "CATEGORY", "SUBCATEGORY", "OPTIONS", "MAX"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let catalog = match path {
        Some(p) => Catalog::load(p).with_context(|| format!("{} is invalid", p.display()))?,
        None => {
            let config = super::config_or_default(root)?;
            let warnings = config.validate(root);
            for w in &warnings {
                eprintln!("{:?}: {}", w.level, w.message);
            }
            if warnings.iter().any(|w| w.level == WarnLevel::Error) {
                anyhow::bail!("configuration has errors");
            }
            super::load_catalog(root)?
        }
    };

    let counts: Vec<(Category, usize)> = Category::all()
        .iter()
        .map(|&c| (c, catalog.by_category(c).count()))
        .collect();

    if json {
        let by_category: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(c, n)| (c.as_str().to_string(), serde_json::json!(n)))
            .collect();
        return print_json(&serde_json::json!({
            "valid": true,
            "version": catalog.version,
            "questions": catalog.len(),
            "by_category": by_category,
        }));
    }

    println!("ok: {} questions (version {})", catalog.len(), catalog.version);
    for (c, n) in counts {
        println!("  {:<22} {n}", c.display_name());
    }
    Ok(())
}
