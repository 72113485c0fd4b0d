//! mystool plugin data tool: entry point.
//!
//! Loads the plugin data file the same way the bot does at startup, so a
//! broken or stale file can be diagnosed without starting the bot.  A missing
//! file is created with defaults.
//!
//! # Usage
//!
//! ```text
//! mystool-data [OPTIONS]
//!
//! Options:
//!   --data-dir  <DIR>    Plugin data directory [default: data/nonebot-plugin-mystool]
//!   --rewrite            Write the reconciled data back to the file
//!   --log-level <LEVEL>  Log level when RUST_LOG is unset [default: info]
//! ```
//!
//! `--rewrite` persists what the bot would persist on its next save, e.g.
//! device/salt values reset by the override guard.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mystool_data::domain::plugin_data::DEFAULT_DATA_DIR;
use mystool_data::{
    ConfigStore, DataPaths, GuardOutcome, LoadOutcome, LoadReport, PluginData, SerdeUserCodec,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Load, check and optionally rewrite the mystool plugin data file.
#[derive(Debug, Parser)]
#[command(name = "mystool-data", version)]
struct Cli {
    /// Directory holding `plugin_data.json`.
    #[arg(long, default_value = DEFAULT_DATA_DIR, env = "MYSTOOL_DATA_DIR")]
    data_dir: PathBuf,

    /// Write the reconciled plugin data back to the file after loading.
    #[arg(long)]
    rewrite: bool,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info", env = "MYSTOOL_LOG_LEVEL")]
    log_level: String,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `RUST_LOG` wins over `--log-level`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let paths = DataPaths::new(&cli.data_dir);
    let mut store: ConfigStore<Value, SerdeUserCodec> = ConfigStore::new(&paths, SerdeUserCodec);

    let report = store.load().with_context(|| {
        format!(
            "could not load plugin data from {}",
            paths.data_dir().display()
        )
    })?;
    println!("{}", summarize(&report, &store.current()));

    if cli.rewrite {
        let written = store
            .write()
            .with_context(|| format!("could not write {}", store.path().display()))?;
        if !written {
            bail!(
                "plugin data could not be serialized; {} left unchanged",
                store.path().display()
            );
        }
        info!("rewrote {}", store.path().display());
    } else if matches!(
        report.outcome,
        LoadOutcome::Merged {
            guard: GuardOutcome::Reset,
            ..
        }
    ) {
        warn!("run with --rewrite to store the default device_config and salt_config");
    }

    Ok(())
}

/// Renders the human-readable load summary printed on stdout.
fn summarize(report: &LoadReport, data: &PluginData<Value>) -> String {
    let origin = match &report.outcome {
        LoadOutcome::Created => "created with defaults".to_string(),
        LoadOutcome::Merged {
            guard,
            file_version,
        } => {
            let guard = match guard {
                GuardOutcome::Untouched => "device/salt: defaults",
                GuardOutcome::Reset => "device/salt: reset to defaults",
                GuardOutcome::Bypassed => "device/salt: overridden by file",
            };
            format!(
                "loaded (file version {}, {guard})",
                file_version.as_deref().unwrap_or("unknown")
            )
        }
    };

    format!(
        "{}: {origin}\nversion: {}\nusers: {}/{}\nplan time: {}",
        report.path.display(),
        data.version,
        data.users.len(),
        data.preference.max_user,
        data.preference.plan_time,
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mystool_data::LogDirStatus;

    fn report(outcome: LoadOutcome) -> LoadReport {
        LoadReport {
            path: PathBuf::from("plugin_data.json"),
            outcome,
            log_dir: LogDirStatus::Ready,
        }
    }

    #[test]
    fn test_cli_defaults() {
        // Arrange: parse with no arguments (all defaults apply)
        let cli = Cli::parse_from(["mystool-data"]);

        // Assert
        assert_eq!(cli.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(!cli.rewrite);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_custom_data_dir_and_rewrite() {
        let cli = Cli::parse_from(["mystool-data", "--data-dir", "/srv/bot/data", "--rewrite"]);
        assert_eq!(cli.data_dir, PathBuf::from("/srv/bot/data"));
        assert!(cli.rewrite);
    }

    #[test]
    fn test_summary_for_created_file() {
        let data = PluginData::default();
        let text = summarize(&report(LoadOutcome::Created), &data);
        assert!(text.contains("created with defaults"));
        assert!(text.contains("users: 0/10"));
    }

    #[test]
    fn test_summary_for_reset_guard() {
        let data = PluginData::default();
        let outcome = LoadOutcome::Merged {
            guard: GuardOutcome::Reset,
            file_version: Some("v1.0.0".to_string()),
        };
        let text = summarize(&report(outcome), &data);
        assert!(text.contains("file version v1.0.0"));
        assert!(text.contains("reset to defaults"));
    }
}
