use anyhow::Result;
use apigate::cloud::CloudCredentials;
use apigate::loader::load_apis;
use apigate::project::ProjectFileSet;
use apigate::validation::validate_local_apis;
use colored::Colorize;
use std::path::Path;
use tracing::{info, warn};

pub fn validate_command(project: &Path, config: &Path) -> Result<()> {
    let config_path = super::resolve_config_path(project, config);
    println!("Validating {} in {}", config_path.display(), project.display());

    let file_set = super::scan(project)?;
    let digest = short_digest(&file_set);
    info!("Collected {} project files", file_set.len());

    let mut apis = load_apis(&config_path)?;
    let credentials = CloudCredentials::from_env();

    let report = match validate_local_apis(&mut apis, &file_set, &credentials) {
        Ok(report) => report,
        Err(err) => {
            eprintln!();
            eprintln!("{:?}", miette::Report::new(err));
            anyhow::bail!("Validation failed");
        }
    };

    for advisory in report.advisories() {
        eprintln!("{} {advisory}", "warning:".yellow().bold());
    }

    println!(
        "\n✅ All {} apis validated (project {})",
        apis.len(),
        digest
    );
    Ok(())
}

/// Abbreviated project digest; an unreadable file only costs the identifier
fn short_digest(file_set: &ProjectFileSet) -> String {
    match file_set.digest() {
        Ok(digest) => digest[..12].to_string(),
        Err(err) => {
            warn!("Could not compute project digest: {err}");
            "unknown".to_string()
        }
    }
}
