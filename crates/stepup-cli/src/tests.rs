use clap::Parser;
use stepup_core::{DiscoveryError, UpgradePackage, UpgradeUnit};
use stepup_ledger::{FileLedger, Ledger};

use crate::commands::is_affirmative;
use crate::render;

use super::*;

struct StaticPackage {
    ids: Vec<(&'static str, Vec<&'static str>)>,
}

impl UpgradePackage for StaticPackage {
    fn name(&self) -> &str {
        "static"
    }

    fn upgrades(&self) -> Result<Vec<UpgradeUnit>, DiscoveryError> {
        self.ids
            .iter()
            .map(|(id, depends_on)| {
                UpgradeUnit::new(
                    *id,
                    depends_on.iter().copied(),
                    || "static upgrade".to_string(),
                    || Ok(()),
                )
            })
            .collect()
    }
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments must parse")
}

#[test]
fn affirmative_answers_accept_y_and_yes_only() {
    for answer in ["y", "Y", "yes", "YES", " yes \n"] {
        assert!(is_affirmative(answer), "{answer:?} must confirm");
    }
    for answer in ["", "n", "no", "maybe", "yess"] {
        assert!(!is_affirmative(answer), "{answer:?} must not confirm");
    }
}

#[test]
fn config_parses_scheduler_gate() {
    let config = CliConfig::from_toml_str(
        r#"
log_file = "/var/log/site/upgrade.log"

[scheduler]
status_command = ["taskq", "status"]
stopped_markers = ["queue mode: MANUAL", "running tasks: 0"]
stop_hint = "taskq stop"
start_hint = "taskq start"
"#,
    )
    .expect("config must parse");

    assert_eq!(
        config.log_file.as_deref(),
        Some(std::path::Path::new("/var/log/site/upgrade.log"))
    );
    let gate = config.scheduler.expect("gate must be set");
    assert_eq!(gate.status_command, vec!["taskq", "status"]);
    assert_eq!(gate.stop_hint, "taskq stop");
}

#[test]
fn empty_config_uses_defaults() {
    let config = CliConfig::from_toml_str("").expect("config must parse");
    assert_eq!(config, CliConfig::default());
}

#[test]
fn config_rejects_malformed_toml() {
    assert!(CliConfig::from_toml_str("log_file = [").is_err());
}

#[test]
fn pending_lines_include_id_and_info() {
    let units = vec![UpgradeUnit::new(
        "site_2020_01_01_seed",
        Vec::<String>::new(),
        || "Seed the installation".to_string(),
        || Ok(()),
    )
    .expect("unit id must parse")];

    assert_eq!(
        render::format_pending_lines(&units),
        vec![" * site_2020_01_01_seed (Seed the installation)"]
    );
}

#[test]
fn pending_json_carries_unit_metadata() {
    let units = vec![UpgradeUnit::new(
        "site_2020_01_02_index",
        ["site_2020_01_01_seed"],
        || "Add the lookup index".to_string(),
        || Ok(()),
    )
    .expect("unit id must parse")
    .with_estimate(|| 30)];

    let value = render::pending_json(&units);
    assert_eq!(value[0]["id"], "site_2020_01_02_index");
    assert_eq!(value[0]["repository"], "site");
    assert_eq!(value[0]["depends_on"][0], "site_2020_01_01_seed");
    assert_eq!(value[0]["estimate_seconds"], 30);
}

#[test]
fn cli_rejects_unknown_subcommands() {
    assert!(Cli::try_parse_from(["stepup", "frobnicate"]).is_err());
}

#[test]
fn run_applies_pending_upgrades_unattended() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let state_dir = dir.path().to_str().expect("utf-8 path");

    let packages: Vec<Box<dyn UpgradePackage>> = vec![Box::new(StaticPackage {
        ids: vec![
            ("site_2020_01_01_seed", vec![]),
            ("site_2020_01_02_index", vec!["site_2020_01_01_seed"]),
        ],
    })];

    let cli = parse(&["stepup", "--state-dir", state_dir, "run", "--yes"]);
    run_cli(cli, packages).expect("run must succeed");

    let ledger = FileLedger::new(dir.path().join("upgrade.ledger"));
    let applied = ledger
        .list_all()
        .expect("must list")
        .into_iter()
        .map(|entry| entry.id)
        .collect::<Vec<_>>();
    assert_eq!(applied.len(), 2);
    assert!(applied.contains(&"site_2020_01_01_seed".to_string()));
    assert!(applied.contains(&"site_2020_01_02_index".to_string()));
}

#[test]
fn run_is_a_no_op_once_everything_is_applied() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let state_dir = dir.path().to_str().expect("utf-8 path");

    let packages = || -> Vec<Box<dyn UpgradePackage>> {
        vec![Box::new(StaticPackage {
            ids: vec![("site_2020_01_01_seed", vec![])],
        })]
    };

    let cli = parse(&["stepup", "--state-dir", state_dir, "run", "--yes"]);
    run_cli(cli, packages()).expect("run must succeed");

    let cli = parse(&["stepup", "--state-dir", state_dir, "run", "--yes"]);
    run_cli(cli, packages()).expect("second run must be a no-op");

    let ledger = FileLedger::new(dir.path().join("upgrade.ledger"));
    assert_eq!(ledger.list_all().expect("must list").len(), 1);
}

#[test]
fn check_passes_with_no_registered_packages() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let state_dir = dir.path().to_str().expect("utf-8 path");

    let cli = parse(&["stepup", "--state-dir", state_dir, "check"]);
    run_cli(cli, Vec::new()).expect("check must succeed");
}

#[test]
fn show_applied_works_on_a_fresh_state_dir() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let state_dir = dir.path().to_str().expect("utf-8 path");

    let cli = parse(&["stepup", "--state-dir", state_dir, "show", "applied"]);
    run_cli(cli, Vec::new()).expect("show applied must succeed");

    let cli = parse(&["stepup", "--state-dir", state_dir, "show", "pending", "--json"]);
    run_cli(cli, Vec::new()).expect("show pending must succeed");
}

#[test]
fn create_recipe_scaffolds_into_target_directory() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let state_dir = dir.path().to_str().expect("utf-8 path");
    let pkg_dir = dir.path().join("site");
    std::fs::create_dir_all(&pkg_dir).expect("must create");
    let pkg_path = pkg_dir.to_str().expect("utf-8 path");

    let cli = parse(&["stepup", "--state-dir", state_dir, "create", "recipe", pkg_path]);
    run_cli(cli, Vec::new()).expect("create recipe must succeed");

    let generated = std::fs::read_dir(&pkg_dir)
        .expect("must read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(generated.len(), 1);
    assert!(generated[0].starts_with("site_"));
    assert!(generated[0].ends_with("_rename_me.rs"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let state_dir = dir.path().to_str().expect("utf-8 path");
    let config_path = dir.path().join("absent.toml");

    let cli = parse(&[
        "stepup",
        "--state-dir",
        state_dir,
        "--config",
        config_path.to_str().expect("utf-8 path"),
        "check",
    ]);
    let err = run_cli(cli, Vec::new()).expect_err("must fail");
    assert!(err.to_string().contains("config file does not exist"));
}
