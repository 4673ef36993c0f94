use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::loader;
use crate::model::{OfferKind, CURRENT_SCHEMA_VERSION};
use crate::output::{self, OutputFormat};
use crate::page::PageSettings;
use crate::runner::{FailurePolicy, Options, PageBuild, Runner};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');

    if let Some(about) = cmd.get_about() {
        out.push_str(&about.to_string());
        out.push('\n');
    }
    if let Some(long_about) = cmd.get_long_about() {
        out.push('\n');
        out.push_str(&long_about.to_string());
        out.push('\n');
    }

    out.push_str("\nUsage: ");
    out.push_str(cmd.get_name());
    out.push_str(" [OPTIONS]\n\n");

    let mut sections: Vec<(String, Vec<&clap::Arg>)> = Vec::new();
    let mut section_idx: HashMap<String, usize> = HashMap::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options").to_string();
        let idx = *section_idx.entry(heading.clone()).or_insert_with(|| {
            sections.push((heading, Vec::new()));
            sections.len() - 1
        });
        sections[idx].1.push(arg);
    }

    for (heading, args) in sections {
        out.push_str(&heading);
        out.push_str(":\n");
        for arg in args {
            let mut parts: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                parts.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                parts.push(format!("--{long}"));
            }
            for alias in arg.get_visible_aliases().unwrap_or_default() {
                let rendered = format!("--{alias}");
                if !parts.contains(&rendered) {
                    parts.push(rendered);
                }
            }
            let mut flags = parts.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                flags.push_str(&format!(" <{value_name}>"));
            }

            out.push_str("  ");
            out.push_str(&flags);
            out.push('\n');
            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str("          ");
                    out.push_str(help.trim());
                    out.push('\n');
                }
            }
            out.push('\n');
        }
    }
    out
}

fn init_tracing(verbose: u8, no_color: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    insurance: String,
    leasing: String,
    base: Option<String>,
    output: Option<String>,
    format: OutputFormat,
    timeout: u64,
    retry: bool,
    failure_policy: FailurePolicy,
    page: PageSettings,
    no_color: bool,
    quiet: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    let insurance = args
        .insurance
        .or(cfg.insurance)
        .unwrap_or_else(|| OfferKind::Insurance.default_resource().to_string());
    let leasing = args
        .leasing
        .or(cfg.leasing)
        .unwrap_or_else(|| OfferKind::Leasing.default_resource().to_string());
    let base = args.base.or(cfg.base).filter(|b| !b.trim().is_empty());

    let output_path = args
        .output
        .or(cfg.output)
        .filter(|o| !o.trim().is_empty())
        .map(|o| config::expand_tilde_string(&o));
    let format = match args.format.or(cfg.format) {
        Some(raw) => {
            OutputFormat::parse(&raw).ok_or_else(|| format!("invalid output format '{raw}'"))?
        }
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(loader::DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected a positive number of seconds".to_string());
    }
    let retry = !args.no_retry && cfg.retry.unwrap_or(true);
    let failure_policy = match args.failure_policy.or(cfg.failure_policy) {
        Some(raw) => FailurePolicy::parse(&raw)
            .ok_or_else(|| format!("invalid failure policy '{raw}'"))?,
        None => FailurePolicy::default(),
    };

    let defaults = PageSettings::default();
    let page = PageSettings {
        title: args.title.or(cfg.title).unwrap_or(defaults.title),
        stylesheet: match args.stylesheet.or(cfg.stylesheet) {
            Some(href) if href.trim().is_empty() => None,
            Some(href) => Some(href),
            None => defaults.stylesheet,
        },
        lang: defaults.lang,
    };

    Ok(RunConfig {
        insurance,
        leasing,
        base,
        output: output_path,
        format,
        timeout,
        retry,
        failure_policy,
        page,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        quiet: args.quiet || cfg.quiet.unwrap_or(false),
    })
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn format_kind(kind: OutputFormat) -> &'static str {
    match kind {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
        OutputFormat::Html => "html",
    }
}

fn print_settings(run: &RunConfig) {
    format_kv_line("Insurance", &run.insurance);
    format_kv_line("Leasing", &run.leasing);
    format_kv_line("Base", run.base.as_deref().unwrap_or("."));
    format_kv_line("Output", run.output.as_deref().unwrap_or("stdout"));
    format_kv_line("Format", format_kind(run.format));
    format_kv_line("Timeout", &format!("{}s", run.timeout));
    format_kv_line("Retry", format_bool(run.retry));
    format_kv_line("On error", run.failure_policy.as_str());
    eprintln!();
}

fn print_summary(build: &PageBuild) {
    for s in build.statuses.iter() {
        let state = match s.state {
            "loaded" => s.state.green(),
            "empty" => s.state.yellow(),
            _ => s.state.red(),
        };
        let mut line = format!("{state} {} offers", s.offers);
        if s.dropped > 0 {
            line.push_str(&format!(", {} dropped", s.dropped));
        }
        if let Some(schema) = s.schema_version {
            line.push_str(&format!(", schema v{schema}"));
        }
        if s.attempts > 1 {
            line.push_str(&format!(", {} attempts", s.attempts));
        }
        format_kv_line(s.kind.label(), &line);
        if let Some(error) = s.error.as_deref() {
            format_kv_line("", &error.dimmed().to_string());
        }
    }
}

fn loading_bar(quiet: bool) -> Result<ProgressBar, String> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(2);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Loading   : [{pos}/{len}] :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?
        .progress_chars(r#"#>-"#),
    );
    Ok(pb)
}

async fn write_output(path: Option<&str>, rendered: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to flush stdout: {e}"))
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if !run.quiet {
        print_settings(&run);
    }

    let options = Options {
        insurance: run.insurance.clone(),
        leasing: run.leasing.clone(),
        base: run.base.clone(),
        timeout_seconds: run.timeout,
        retry: run.retry,
        failure_policy: run.failure_policy,
        page: run.page.clone(),
        progress: Some(loading_bar(run.quiet)?),
    };
    let runner = Runner::new(options).map_err(|e| e.to_string())?;
    let build = runner.run().await.map_err(|e| e.to_string())?;

    let rendered = output::render(run.format, &build)?;
    write_output(run.output.as_deref(), &rendered).await?;

    if !run.quiet {
        print_summary(&build);
        eprintln!();
        eprintln!(
            ":: Completed :: page built in {}ms ::",
            build.elapsed.as_millis()
        );
    }
    Ok(())
}

async fn run_migrate(paths: Vec<String>, quiet: bool) -> Result<(), String> {
    let mut failed = 0usize;
    for raw in paths {
        let path = config::expand_tilde(&raw);
        match loader::migrate_file(&path).await {
            Ok(m) if !quiet => {
                let note = if m.changed() {
                    format!(
                        "v{} -> v{} ({} records)",
                        m.from.number(),
                        CURRENT_SCHEMA_VERSION,
                        m.records
                    )
                } else {
                    format!("already current ({} records)", m.records)
                };
                format_kv_line("Migrated", &format!("{} {}", raw, note));
            }
            Ok(_) => {}
            Err(e) => {
                failed += 1;
                eprintln!("{} {e}", "error:".red());
            }
        }
    }
    if failed > 0 {
        return Err(format!("{failed} file(s) could not be migrated"));
    }
    Ok(())
}

fn config_location(args: &CliArgs) -> Option<(PathBuf, bool)> {
    match args.config.as_deref() {
        Some(p) => Some((config::expand_tilde(p), false)),
        None => config::default_config_path().map(|p| (p, true)),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };
    dispatch(args)
}

fn dispatch(args: CliArgs) -> Result<(), String> {
    validation::validate(&args)?;

    if args.no_color {
        colored::control::set_override(false);
    }
    init_tracing(args.verbose, args.no_color);

    if args.init_config {
        let (path, _) = config_location(&args)
            .ok_or_else(|| "cannot determine home directory for config".to_string())?;
        config::ensure_default_config_file(&path)?;
        format_kv_line("Config", &path.display().to_string());
        return Ok(());
    }

    let cfg = match config_location(&args) {
        Some((path, allow_missing)) => config::load_config(&path, allow_missing)?,
        None => ConfigFile::default(),
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    if !args.migrate.is_empty() {
        let quiet = args.quiet;
        return rt.block_on(run_migrate(args.migrate, quiet));
    }

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    rt.block_on(run_async(run))
}
