//! OldRedirect CLI
//!
//! Developer tooling: check URLs against the redirect rules, print the
//! interception filter and manifest fragment, and check decision latency.

mod budget;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use oldr_core::filter::{BLOCKING, REQUIRED_PERMISSIONS};
use oldr_core::{LogDiagnostics, RedirectConfig, Redirector, RequestFilter};

use crate::budget::BudgetOptions;

#[derive(Parser)]
#[command(name = "oldr-cli")]
#[command(about = "OldRedirect rule checker and tools")]
struct Cli {
    /// JSON configuration file (defaults to the built-in rules)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the decision for each URL
    Check {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the interception filter as JSON
    Filter {
        /// Print the manifest permissions fragment instead
        #[arg(long)]
        manifest: bool,
    },

    /// Print the effective configuration as JSON
    Config,

    /// Check decision latency against the budget
    Budget {
        /// Passes over the request corpus
        #[arg(short, long, default_value_t = 2000)]
        iterations: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Check { urls } => cmd_check(config, &urls),
        Commands::Filter { manifest } => cmd_filter(config, manifest),
        Commands::Config => cmd_config(config),
        Commands::Budget { iterations } => budget::run_budget(BudgetOptions { config, iterations }),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RedirectConfig, String> {
    let Some(path) = path else {
        return Ok(RedirectConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let config = RedirectConfig::from_json(&text)
        .map_err(|e| format!("Failed to load '{}': {}", path.display(), e))?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

fn build_redirector(config: RedirectConfig) -> Result<Redirector, String> {
    Redirector::new(config).map_err(|e| format!("Invalid configuration: {}", e))
}

fn cmd_check(config: RedirectConfig, urls: &[String]) -> Result<(), String> {
    let redirector = build_redirector(config)?;
    for url in urls {
        println!("{}", describe(&redirector, url));
    }
    Ok(())
}

/// `<url>  <class>  <unchanged | redirect -> target>`
fn describe(redirector: &Redirector, url: &str) -> String {
    let class = match oldr_core::url::parse_request_url(url) {
        Ok(parsed) => redirector
            .classify_host(&oldr_core::url::request_host(&parsed))
            .to_string(),
        Err(_) => "malformed".to_string(),
    };
    let outcome = match redirector.decide_or_unchanged(url, &LogDiagnostics).redirect_url() {
        Some(target) => format!("redirect -> {}", target),
        None => "unchanged".to_string(),
    };
    format!("{}  {}  {}", url, class, outcome)
}

fn cmd_filter(config: RedirectConfig, manifest: bool) -> Result<(), String> {
    let redirector = build_redirector(config)?;
    let filter = RequestFilter::for_config(redirector.config());

    let value = if manifest {
        let mut permissions: Vec<String> = REQUIRED_PERMISSIONS.iter().map(|p| p.to_string()).collect();
        permissions.extend(filter.url_patterns());
        json!({ "permissions": permissions })
    } else {
        json!({ "filter": filter.spec(), "extraInfoSpec": [BLOCKING] })
    };

    print_json(&value)
}

fn cmd_config(config: RedirectConfig) -> Result<(), String> {
    let redirector = build_redirector(config)?;
    print_json(redirector.config())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
    println!("{}", text);
    Ok(())
}
