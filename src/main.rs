use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use is_terminal::IsTerminal;
use log::{LevelFilter, debug, info};

use salesforce_seed::api::SalesforceClient;
use salesforce_seed::auth::Credentials;
use salesforce_seed::cli::Cli;
use salesforce_seed::config::Config;
use salesforce_seed::loader::{ConsoleReporter, LoadContext, LoadOptions, Pipeline, Reporter, UserMode};
use salesforce_seed::sheet::ExcelWorkbook;

/// Log to `path`, truncating it, as `<timestamp> - LEVEL: message`
fn init_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .filter_module("hyper", LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Info)
        .filter_module("rustls", LevelFilter::Info)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config names the log file, so it is read first and logged after
    let (mut config, source) = Config::load(cli.config.as_deref())?;
    if cli.production {
        config.api.sandbox = false;
    }

    init_logging(&config.load.log_file)?;
    info!("Starting salesforce-seed");
    info!("Configuration from {}", source);
    debug!("Loaded config: {:?}", config);

    tokio::select! {
        _ = run(&cli, &config) => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nExiting program");
            info!("Interrupted");
        }
    }

    Ok(())
}

/// Everything after logging is up. Failures are reported here and end the
/// run without a non-zero exit status.
async fn run(cli: &Cli, config: &Config) {
    let reporter = ConsoleReporter;

    let interactive = std::io::stdin().is_terminal();
    let credentials = match Credentials::resolve(cli.credentials(), cli.env_file.as_deref(), interactive) {
        Ok(credentials) => credentials,
        Err(e) => {
            reporter.failure("Could not read credentials", e.as_ref());
            return;
        }
    };

    let mut workbook = match ExcelWorkbook::open(&cli.workbook) {
        Ok(workbook) => workbook,
        Err(e) => {
            reporter.failure("Could not load Excel workbook", &e);
            return;
        }
    };
    info!("Opened workbook {:?} with sheets {:?}", cli.workbook, workbook.sheet_names());

    reporter.info("Logging in");
    let client = match SalesforceClient::login(&credentials, &config.api).await {
        Ok(client) => client,
        Err(e) => {
            reporter.failure("Could not log in", &e);
            return;
        }
    };
    info!("Logged in to {}", client.instance_url());

    let user_mode = if cli.create_users {
        UserMode::Create
    } else {
        UserMode::Lookup
    };
    let options = LoadOptions::from_config(config, user_mode);
    let mut ctx = LoadContext {
        session: &client,
        sheets: &mut workbook,
        options: &options,
        reporter: &reporter,
    };

    // Failures were already reported by the pipeline
    if let Ok(summary) = Pipeline::standard().run(&mut ctx).await {
        println!(
            "{} ({} created, {} failed)",
            "Finished".green().bold(),
            summary.total_created(),
            summary.total_failed()
        );
        info!("Finished run {}", summary.run_id);
    }
}
