use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use stepup_core::{parse_repository, UpgradeUnit};
use stepup_graph::find_endpoints;
use stepup_ledger::Ledger;

pub const DEPENDS_ON_SENTINEL: &str = "CHANGE_ME";

const RECIPE_TEMPLATE: &str = r#"use stepup_core::{DiscoveryError, UpgradeUnit};

pub fn upgrade() -> Result<UpgradeUnit, DiscoveryError> {
    let unit = UpgradeUnit::new(
        "@ID@",
        [@DEPENDS_ON@],
        || "Short description of the upgrade shown to the operator".to_string(),
        || {
            // Apply the upgrade here. Signal a recoverable failure with
            // Err(stepup_core::HookError::new("what went wrong")).
            Ok(())
        },
    )?
    // Optional hooks: estimated running time in seconds, checks run before
    // any upgrade in the batch is applied, checks run after the whole batch.
    .with_estimate(|| 1)
    .with_pre_upgrade(|| Ok(()))
    .with_post_upgrade(|| Ok(()));
    Ok(unit)
}
"#;

#[derive(Debug, Clone, Default)]
pub struct RecipeOptions {
    pub repository: Option<String>,
    pub depends_on: Option<Vec<String>>,
    pub release: bool,
    pub output_path: Option<PathBuf>,
}

/// Scaffold a release upgrade that depends on every current endpoint,
/// merged across all repositories.
pub fn create_release_recipe(
    units: &BTreeMap<String, UpgradeUnit>,
    pkg_path: &Path,
    options: &RecipeOptions,
    ledger: &dyn Ledger,
    today: NaiveDate,
) -> Result<PathBuf> {
    let endpoints = find_endpoints(units);
    if endpoints.is_empty() {
        bail!("no upgrades found to anchor a release recipe on");
    }

    let depends_on = endpoints
        .values()
        .flatten()
        .cloned()
        .collect::<Vec<_>>();
    let options = RecipeOptions {
        repository: options.repository.clone(),
        depends_on: Some(depends_on),
        release: true,
        output_path: options.output_path.clone(),
    };
    create_recipe(pkg_path, &options, ledger, today)
}

/// Scaffold a new upgrade unit source file and return its path.
pub fn create_recipe(
    pkg_path: &Path,
    options: &RecipeOptions,
    ledger: &dyn Ledger,
    today: NaiveDate,
) -> Result<PathBuf> {
    let path = options.output_path.as_deref().unwrap_or(pkg_path);
    if !path.exists() {
        bail!("path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("path is not a directory: {}", path.display());
    }

    let repository = match &options.repository {
        Some(repository) => repository.clone(),
        None => infer_repository(pkg_path)?,
    };

    let filename = if options.release {
        format!("{repository}_release_x_y_z.rs")
    } else {
        format!("{repository}_{}_rename_me.rs", today.format("%Y_%m_%d"))
    };

    let stem = filename
        .strip_suffix(".rs")
        .unwrap_or(&filename)
        .to_string();
    let round_trip = parse_repository(&stem).map_err(|_| {
        anyhow!(
            "generated recipe name '{stem}' cannot be parsed back into a repository; \
             override it with --repository"
        )
    })?;
    if round_trip != repository {
        bail!(
            "generated recipe name '{stem}' parses to repository '{round_trip}', \
             not '{repository}'; override it with --repository"
        );
    }

    let recipe_path = path.join(&filename);
    if recipe_path.exists() {
        bail!(
            "could not generate upgrade recipe: {} already exists",
            recipe_path.display()
        );
    }

    let depends_on = match &options.depends_on {
        Some(depends_on) if !depends_on.is_empty() => depends_on.clone(),
        _ => match ledger.latest(&repository)? {
            Some(entry) => vec![entry.id],
            None => vec![DEPENDS_ON_SENTINEL.to_string()],
        },
    };

    let rendered = RECIPE_TEMPLATE
        .replace("@ID@", &stem)
        .replace("@DEPENDS_ON@", &render_depends_on(&depends_on));
    fs::write(&recipe_path, rendered)
        .with_context(|| format!("failed to write upgrade recipe: {}", recipe_path.display()))?;

    tracing::info!("created new upgrade recipe: {}", recipe_path.display());
    Ok(recipe_path)
}

fn infer_repository(pkg_path: &Path) -> Result<String> {
    pkg_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow!(
                "could not infer a repository from path '{}'; pass --repository",
                pkg_path.display()
            )
        })
}

fn render_depends_on(depends_on: &[String]) -> String {
    depends_on
        .iter()
        .map(|id| format!("\"{id}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
