use anyhow::Context;
use readiness_core::{config::Config, paths, store::Store};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing readiness in: {}", root.display());

    let dir = paths::readiness_dir(root);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    // An existing config is never overwritten.
    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    let db_path = paths::db_path(root);
    let existed = db_path.exists();
    Store::open(&db_path).with_context(|| format!("failed to open {}", db_path.display()))?;
    if existed {
        println!("  exists:  {}", paths::DB_FILE);
    } else {
        println!("  created: {}", paths::DB_FILE);
    }

    let config = Config::load(root)?;
    for warning in config.validate(root) {
        println!("  {:?}: {}", warning.level, warning.message);
    }

    println!("\nDone. Run 'readiness serve' to start taking assessments.");
    Ok(())
}
