//! archlint CLI
//!
//! Architecture-as-code manifest validator.

mod cli;
mod output;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use archlint_core::{Validator, ValidatorConfig, WorkspaceFetcher};
use archlint_model::Locator;
use archlint_rules::{BuiltinEvaluator, builtin_descriptors};

use cli::{Cli, Commands};
use output::{output_json, output_text};

/// Config file names probed in the workspace, in order.
const CONFIG_CANDIDATES: [&str; 2] = [".archlint.jsonc", ".archlint.json"];

#[tokio::main]
async fn main() -> ExitCode {
    // Environment-style configuration is loaded before anything that
    // depends on it is constructed.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(has_failures) => {
            if has_failures {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Validate {
            workspace,
            root,
            format,
            role,
        } => {
            // Usage errors stay cheap: reject a bad format before any
            // loading or evaluation happens.
            if !matches!(format.as_str(), "text" | "json") {
                return Err(miette!("Unknown output format: {}", format));
            }

            let config = load_config(cli.config.as_deref(), workspace)?;
            let report = validate(workspace, &config, root.as_deref(), role.as_deref()).await?;

            match format.as_str() {
                "json" => output_json(&report)?,
                _ => output_text(&report, cli.verbose),
            }

            Ok(!report.success)
        }
        Commands::Init { workspace, force } => {
            init_workspace(workspace, *force)?;
            Ok(false)
        }
    }
}

/// Loads the validator configuration.
///
/// An explicit `--config` path must exist; otherwise the workspace is
/// probed for the conventional file names and defaults apply when none
/// is present.
fn load_config(explicit: Option<&Path>, workspace: &Path) -> Result<ValidatorConfig> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path.display());
        return ValidatorConfig::from_file(path).into_diagnostic();
    }

    for candidate in CONFIG_CANDIDATES {
        let path = workspace.join(candidate);
        if path.exists() {
            debug!("Loading config from {}", path.display());
            return ValidatorConfig::from_file(&path).into_diagnostic();
        }
    }

    Ok(ValidatorConfig::default())
}

async fn validate(
    workspace: &Path,
    config: &ValidatorConfig,
    root: Option<&str>,
    role: Option<&str>,
) -> Result<archlint_core::ValidationReport> {
    // Malformed input (missing workspace) fails fast, before a session.
    let fetcher = WorkspaceFetcher::new(workspace, &config.root_file).into_diagnostic()?;

    // Role precedence: flag, then environment, then config file.
    let role = role
        .map(str::to_string)
        .or_else(|| std::env::var("ARCHLINT_ROLE").ok())
        .or_else(|| config.role.clone());

    let builtins: Vec<_> = builtin_descriptors()
        .into_iter()
        .filter(|rule| config.builtins.contains(&rule.id))
        .collect();

    let validator = Validator::new(Arc::new(fetcher), Arc::new(BuiltinEvaluator::new()))
        .with_builtins(builtins)
        .with_timeout(config.timeout())
        .with_role(role);

    let root = root
        .map(Locator::new)
        .unwrap_or_else(|| Locator::new(config.root.clone()));

    Ok(validator.validate(&root).await)
}

fn init_workspace(workspace: &Path, force: bool) -> Result<()> {
    let config_path = workspace.join(".archlint.json");
    let manifest_path = workspace.join("architecture.json");

    if !force && (config_path.exists() || manifest_path.exists()) {
        return Err(miette!(
            "Workspace already initialized (use --force to overwrite)"
        ));
    }

    std::fs::create_dir_all(workspace).into_diagnostic()?;
    std::fs::write(
        &config_path,
        r#"{
  "rootFile": "architecture.json",
  "timeoutSecs": 10
}
"#,
    )
    .into_diagnostic()?;
    std::fs::write(
        &manifest_path,
        r#"{
  "manifest": {
    "name": "my-architecture",
    "version": "0.1.0"
  },
  "elements": {
    "example-component": {
      "kind": "component",
      "description": "An example component"
    }
  }
}
"#,
    )
    .into_diagnostic()?;

    println!("Initialized archlint workspace in {}", workspace.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_load_config_prefers_jsonc() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".archlint.jsonc"),
            r#"{ "rootFile": "from-jsonc.json" }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(".archlint.json"),
            r#"{ "rootFile": "from-json.json" }"#,
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.root_file, "from-jsonc.json");
    }

    #[test]
    fn test_load_config_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".archlint.json"),
            r#"{ "rootFile": "probed.json" }"#,
        )
        .unwrap();
        let explicit = dir.path().join("other.json");
        std::fs::write(&explicit, r#"{ "rootFile": "explicit.json" }"#).unwrap();

        let config = load_config(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.root_file, "explicit.json");
    }

    #[test]
    fn test_init_refuses_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_workspace(dir.path(), false).unwrap();
        assert!(init_workspace(dir.path(), false).is_err());
        assert!(init_workspace(dir.path(), true).is_ok());
    }

    #[test]
    fn test_init_output_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        init_workspace(dir.path(), false).unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.root_file, "architecture.json");

        let manifest: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("architecture.json")).unwrap(),
        )
        .unwrap();
        assert!(manifest["elements"].is_object());
    }
}
