//! `golicense-checkr` — audit the licenses of a Go module's dependencies.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config and let flags override it.
//! 3. Scan: parse `go.mod`, resolve, classify and aggregate.
//! 4. Check `--fail-on` against the full dependency set.
//! 5. Partition, filter and sort the view, then render the report.
//! 6. Notify, then exit `0` (clean) or `1` (violations).

mod cli;

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use golicense_checkr::config::{load_config, Config};
use golicense_checkr::error::ClassificationWarning;
use golicense_checkr::filter::{self, SortKey};
use golicense_checkr::license::classifier::LicenseClassifier;
use golicense_checkr::license::locator::LicenseLocator;
use golicense_checkr::license::risk::normalize_term;
use golicense_checkr::models::Dependency;
use golicense_checkr::notify::{Level, Manager, Notification};
use golicense_checkr::report::{self, summary::Summary};
use golicense_checkr::resolver::GoListResolver;
use golicense_checkr::scan::scan;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let manifest_dir = cli
        .go_mod
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let config = load_config(manifest_dir, cli.config.as_deref())?;

    let resolver = GoListResolver::new(
        cli.go_binary
            .clone()
            .unwrap_or_else(|| config.resolver.go_binary.clone()),
    )
    .with_timeout(Duration::from_secs(
        cli.timeout.unwrap_or(config.resolver.timeout_secs),
    ))
    .offline(config.resolver.offline);

    let locator = if cli.license_files.is_empty() {
        LicenseLocator::new(config.licenses.candidates.clone())
    } else {
        LicenseLocator::new(cli.license_files.clone())
    };
    let classifier = LicenseClassifier::new(config.classifier.threshold);

    let show_progress = !cli.quiet && std::io::stderr().is_terminal();
    let outcome = scan(&cli.go_mod, &resolver, &locator, &classifier, show_progress)
        .with_context(|| format!("failed to analyze {}", cli.go_mod.display()))?;

    let fail_on = terms(&cli.fail_on, &config.policy.fail_on);
    let violations = filter::violations(&outcome.dependencies, &fail_on);

    let view = filter::partition(&outcome.dependencies, cli.partition());
    let view = filter::allow(&view, &terms(&cli.allow, &config.policy.allow));
    let view = filter::deny(&view, &terms(&cli.deny, &config.policy.deny));
    let view = filter::sort_by(&view, SortKey::from(cli.sort));

    let styled = cli.out.is_none() && std::io::stdout().is_terminal();
    let rendered = render(&cli, &view, styled)?;
    match &cli.out {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    if !cli.quiet {
        let direct = outcome.dependencies.iter().filter(|d| !d.indirect).count();
        eprintln!(
            "  {} {} {} dependencies ({} direct, {} indirect)",
            "→".cyan(),
            outcome.module_path,
            outcome.dependencies.len(),
            direct,
            outcome.dependencies.len() - direct
        );
        for warning in &outcome.warnings {
            eprintln!("  {} {}", "!".yellow(), warning);
        }
        if !violations.is_empty() {
            eprintln!(
                "  {} {} dependencies violate --fail-on {}",
                "✗".red().bold(),
                violations.len(),
                fail_on.join(",")
            );
        }
    }

    notify(&config, &outcome.warnings, &violations);

    if !violations.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-q`, default and `-v` select error, warn and debug.
fn init_logging(cli: &Cli) {
    let default = if cli.quiet {
        "error"
    } else if cli.verbose {
        "golicense_checkr=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flag values replace the config list; both are normalized through the alias table.
fn terms(flag: &[String], configured: &[String]) -> Vec<String> {
    let source = if flag.is_empty() { configured } else { flag };
    source
        .iter()
        .map(|t| normalize_term(t))
        .filter(|t| !t.is_empty())
        .collect()
}

fn render(cli: &Cli, deps: &[Dependency], styled: bool) -> Result<String> {
    let out = if cli.summary {
        let summary = Summary::from_deps(deps);
        if cli.json {
            summary.to_json()?
        } else {
            summary.to_text()
        }
    } else if cli.json {
        report::json(deps)?
    } else if cli.markdown {
        report::markdown::render(deps)
    } else {
        report::terminal::render(deps, styled)
    };
    Ok(out)
}

fn notify(config: &Config, warnings: &[ClassificationWarning], violations: &[Dependency]) {
    let manager = Manager::from_config(&config.notifications);
    if manager.is_empty() {
        return;
    }

    let mut pending = Vec::new();
    if !warnings.is_empty() {
        let body = warnings
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        pending.push(manager.dispatch(Notification {
            level: Level::Warn,
            title: format!("{} license files could not be read", warnings.len()),
            body,
        }));
    }
    if !violations.is_empty() {
        let body = violations
            .iter()
            .map(|d| format!("{} {} {}", d.path, d.version, d.license))
            .collect::<Vec<_>>()
            .join("\n");
        pending.push(manager.dispatch(Notification {
            level: Level::Error,
            title: format!("{} dependencies violate license policy", violations.len()),
            body,
        }));
    }
    for dispatch in pending {
        dispatch.wait();
    }
}
