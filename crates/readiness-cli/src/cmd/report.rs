use anyhow::Context;
use readiness_core::report::Report;
use std::path::Path;
use uuid::Uuid;

/// Print a completed assessment's report as Markdown, or write it to `out`.
/// An `out` path ending in `.pdf` gets the PDF rendition.
pub fn run(root: &Path, id: Uuid, out: Option<&Path>) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let assessment = store.assessment(id)?;
    if !assessment.is_complete() {
        anyhow::bail!("assessment {id} is not complete");
    }
    let report = Report::from_assessment(&assessment);

    let Some(out) = out else {
        print!("{}", report.to_markdown());
        return Ok(());
    };

    let is_pdf = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let bytes = if is_pdf {
        readiness_server::pdf::render(&report)?
    } else {
        report.to_markdown().into_bytes()
    };
    std::fs::write(out, &bytes)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}
