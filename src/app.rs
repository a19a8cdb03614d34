//! Application orchestrator.
//! Loads/merges config, initializes logging, runs print diagnostics, validates
//! directories, installs the signal handler and runs the scheduler until shutdown.

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use folder_sync::cli::Args;
use folder_sync::config::resolve_config_path;
use folder_sync::output as out;
use folder_sync::print::{CupsClient, run_diagnostics};
use folder_sync::{ShutdownToken, SyncError, load_config_layer, run_until_shutdown, validate_dirs};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        match resolve_config_path(args.config.as_deref()) {
            Some((p, explicit)) => {
                let origin = if explicit { "explicit" } else { "default" };
                out::print_info(&format!("Config file ({origin}):\n  {}", p.display()));
                if !p.exists() {
                    out::print_info("No config file exists there; built-in defaults and CLI/env values are used.");
                }
            }
            None => out::print_warn("Could not determine a default config path."),
        }
        return Ok(());
    }

    // Defaults <- XML <- CLI/env.
    let (mut cfg, loaded_from) = load_config_layer(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);

    // Held until return so file logs are flushed.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;
    if let Some(p) = &loaded_from {
        info!(path = %p.display(), "Loaded config file");
    }
    debug!(?args, "Starting folder_sync");

    let mut sync_cfg = cfg.sync_config().inspect_err(log_sync_error)?;

    if cfg.print.enabled {
        let client = CupsClient::new(cfg.print.host.clone(), cfg.print.port);
        let report = run_diagnostics(&client, &cfg.print).context("print-server diagnostics failed")?;
        out::print_success(&format!("Print server reachable ({} printer(s))", report.printers.len()));
        if let Some(p) = cfg.print.printer.as_deref().filter(|_| !report.configured_found) {
            out::print_warn(&format!("Printer '{p}' not found on the print server"));
        }
    }

    validate_dirs(&mut sync_cfg).inspect_err(log_sync_error)?;

    let token = ShutdownToken::new();
    {
        let token = token.clone();
        ctrlc::set_handler(move || {
            out::print_warn("Received shutdown signal; finishing current pass...");
            token.cancel();
        })
        .context("install signal handler")?;
    }

    run_until_shutdown(sync_cfg, token)?;
    info!("over and out");
    Ok(())
}

fn log_sync_error(e: &SyncError) {
    error!(code = e.code(), kind = e.kind(), error = %e, "Startup failed");
}
