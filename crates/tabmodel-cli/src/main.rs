use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use tabmodel_core::{Config, Diagnostic, DiagnosticCode, Report, Severity, TableDefinition};
use tabmodel_data::{DataInput, InputDataModel, JsonInput, XmlInput};
use tabmodel_engine::{ConditionEngine, ModelValidation, TableSnapshot, ValueResolver};

const DEFAULT_CONFIG: &str = "tabmodel.toml";
const MODEL_SUFFIX: &str = ".model.json";

/// tabmodel - Validate and preview tabular report models
#[derive(Parser)]
#[command(name = "tabmodel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: tabmodel.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate model files and write a report
    Validate {
        /// Model files or directories holding *.model.json files
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Evaluate a model against a data file and print the result
    Preview {
        /// Model file
        model: PathBuf,

        /// Data file (.xml, otherwise read as JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Filter key replacing the table filter
        #[arg(short, long, conflicts_with = "no_filter")]
        filter: Option<String>,

        /// Show every row
        #[arg(long)]
        no_filter: bool,

        /// XML element holding one row
        #[arg(long)]
        row_element: Option<String>,

        /// Maximum number of rows to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the fields of a model
    Fields {
        /// Model file
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Validate { paths, output, markdown } => {
            validate_command(&config, &paths, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Preview {
            model,
            data,
            filter,
            no_filter,
            row_element,
            limit,
            json,
        } => {
            let options = PreviewOptions {
                filter,
                no_filter,
                row_element,
                limit,
                json,
            };
            preview_command(&config, &model, &data, &options)
        }
        Commands::Fields { model } => fields_command(&config, &model),
    }
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::from_file(Path::new(DEFAULT_CONFIG))?,
        None => {
            if verbose {
                eprintln!("{}", "No config file found, using defaults".yellow());
            }
            Config::default()
        }
    };

    if verbose {
        eprintln!("{} culture: {:?}", "Using".cyan(), config.culture);
    }
    Ok(config)
}

/// Load a model and apply the configured bindings
fn load_model(config: &Config, path: &Path) -> Result<TableDefinition> {
    let mut table = TableDefinition::from_file(path)
        .with_context(|| format!("Failed to load model {}", path.display()))?;
    table.apply_bindings(&config.bindings);
    Ok(table)
}

/// Model files named by `paths`; directories contribute their `*.model.json`
fn collect_model_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.file_name().to_string_lossy().ends_with(MODEL_SUFFIX))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Validate command - check every model and write the report
fn validate_command(
    config: &Config,
    paths: &[PathBuf],
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let files = collect_model_files(paths);
    if verbose {
        eprintln!("{} {} model files", "Validating".cyan(), files.len());
    }

    let mut report = Report::new();
    let mut fingerprints = serde_json::Map::new();
    let mut models = Vec::new();

    for file in &files {
        let display = file.display().to_string();
        let table = match load_model(config, file) {
            Ok(table) => table,
            Err(e) => {
                report.add_diagnostic(
                    Diagnostic::new(DiagnosticCode::ModelParseError, Severity::Error, format!("{e:#}"))
                        .in_file(display),
                );
                continue;
            }
        };

        if config.is_model_skipped(&table.name) {
            tracing::debug!(model = %table.name, "skipped by configuration");
            continue;
        }

        if verbose {
            eprintln!("  {} {}...", "Checking".cyan(), table.name);
        }

        let validation = ModelValidation::validate(&table, config, Some(display.clone()));
        if verbose && validation.has_errors() {
            eprintln!("    {} errors found", validation.error_count().to_string().red());
        } else if verbose && validation.has_warnings() {
            eprintln!("    {} warnings", validation.warning_count().to_string().yellow());
        } else if verbose {
            eprintln!("    {}", "✓ OK".green());
        }

        let fingerprint = table.fingerprint()?;
        models.push(serde_json::json!({
            "name": table.name,
            "file": display,
            "fields": table.fields.len(),
            "errors": validation.error_count(),
            "warnings": validation.warning_count(),
            "fingerprint": fingerprint,
        }));
        fingerprints.insert(table.name.clone(), fingerprint.into());

        report.record_model(table.fields.len());
        for diag in validation.diagnostics {
            report.add_diagnostic(diag);
        }
    }

    let report = report.with_metadata(serde_json::json!({
        "fingerprints": fingerprints,
        "models": models,
    }));
    report.save_to_file(output)?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

struct PreviewOptions {
    filter: Option<String>,
    no_filter: bool,
    row_element: Option<String>,
    limit: Option<usize>,
    json: bool,
}

fn open_input(config: &Config, data: &Path, row_element: Option<&str>) -> Box<dyn DataInput> {
    let special_chars = config.special_chars.clone();
    let is_xml = data
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

    if is_xml {
        let mut input = XmlInput::from_file(data).with_special_chars(special_chars);
        if let Some(element) = row_element {
            input = input.with_row_element(element);
        }
        Box::new(input)
    } else {
        Box::new(JsonInput::from_file(data).with_special_chars(special_chars))
    }
}

/// Preview command - evaluate a model against a data file
fn preview_command(config: &Config, model: &Path, data: &Path, options: &PreviewOptions) -> Result<()> {
    let table = load_model(config, model)?;
    let input = open_input(config, data, options.row_element.as_deref());

    let mut data_model = InputDataModel::new(&table, input.as_ref());
    if options.no_filter {
        data_model = data_model.without_filter();
    } else if let Some(key) = &options.filter {
        data_model = data_model.with_filter(key.clone());
    }
    let mut ctx = data_model
        .create_context()
        .with_context(|| format!("Failed to read {}", data.display()))?;
    tracing::info!("{ctx}");

    let resolver = ValueResolver::for_context(&ctx, config);
    let mut engine = ConditionEngine::new();
    let mut snapshot = TableSnapshot::build(&mut ctx, &mut engine, &resolver)?;
    if let Some(limit) = options.limit {
        snapshot.rows.truncate(limit);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_snapshot(&snapshot, ctx.raw_rows().len(), ctx.filtered_len());
    Ok(())
}

fn print_snapshot(snapshot: &TableSnapshot, raw: usize, filtered: usize) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{} {}", "Table:".bold().bright_blue(), snapshot.table.bold());
    println!("{}", "=".repeat(60).bright_blue());
    println!("Rows: {filtered} of {raw} after filtering");
    println!();

    if !snapshot.headers.is_empty() {
        let headers: Vec<String> = snapshot.headers.iter().map(|c| c.value.clone()).collect();
        println!("{}", headers.join(" | ").bold());
    }

    let print_aggregates = |label: &str, cells: &Option<Vec<tabmodel_engine::SnapshotCell>>| {
        if let Some(cells) = cells {
            let values: Vec<&str> = cells.iter().map(|c| c.value.as_str()).collect();
            println!("{} {}", label.cyan(), values.join(" | "));
        }
    };

    print_aggregates("Top:", &snapshot.top_aggregates);
    for row in &snapshot.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| format!("{} {}", cell.value, format!("[{}]", cell.style).dimmed()))
            .collect();
        println!("{}", cells.join(" | "));
    }
    print_aggregates("Bottom:", &snapshot.bottom_aggregates);

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Fields command - list the fields of a model
fn fields_command(config: &Config, model: &Path) -> Result<()> {
    let table = load_model(config, model)?;

    println!("{} {}", "Model:".bold(), table.name.green());
    println!("{} {}", "Fields:".bold(), table.fields.len());
    println!();

    for (i, field) in table.fields.iter().enumerate() {
        let name = match field.field_name() {
            "" => "-".dimmed().to_string(),
            name => name.yellow().to_string(),
        };
        println!(
            "  {}. {} {} width={} header={} value={} aggregate={}",
            i + 1,
            field.field_type(),
            name,
            field.width,
            field.header.style,
            field.value.style,
            field.aggregate.style
        );
    }

    Ok(())
}

/// One validated model as recorded in the report metadata
#[derive(Debug, PartialEq)]
struct ModelEntry {
    name: String,
    file: String,
    fields: u64,
    errors: u64,
    warnings: u64,
    fingerprint: String,
}

fn model_entries(report: &Report) -> Vec<ModelEntry> {
    let Some(models) = report
        .metadata
        .as_ref()
        .and_then(|m| m.get("models"))
        .and_then(|m| m.as_array())
    else {
        return Vec::new();
    };

    let text = |model: &serde_json::Value, key: &str| model[key].as_str().unwrap_or_default().to_string();
    let count = |model: &serde_json::Value, key: &str| model[key].as_u64().unwrap_or_default();
    models
        .iter()
        .map(|model| ModelEntry {
            name: text(model, "name"),
            file: text(model, "file"),
            fields: count(model, "fields"),
            errors: count(model, "errors"),
            warnings: count(model, "warnings"),
            fingerprint: text(model, "fingerprint"),
        })
        .collect()
}

/// Diagnostics grouped by model file, in first-seen order
fn diagnostics_by_file(report: &Report) -> Vec<(String, Vec<&Diagnostic>)> {
    let mut groups: Vec<(String, Vec<&Diagnostic>)> = Vec::new();
    for diag in &report.diagnostics {
        let file = diag
            .location
            .as_ref()
            .and_then(|loc| loc.file.clone())
            .unwrap_or_else(|| "(no file)".to_string());
        match groups.iter_mut().find(|(f, _)| *f == file) {
            Some((_, diags)) => diags.push(diag),
            None => groups.push((file, vec![diag])),
        }
    }
    groups
}

/// Occurrences of each diagnostic code, most frequent first
fn code_counts(report: &Report) -> Vec<(DiagnosticCode, usize)> {
    let mut counts: Vec<(DiagnosticCode, usize)> = Vec::new();
    for diag in &report.diagnostics {
        match counts.iter_mut().find(|(code, _)| *code == diag.code) {
            Some((_, n)) => *n += 1,
            None => counts.push((diag.code, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    counts
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Model Validation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Models checked: {}", report.summary.models_checked);
    println!("  Fields checked: {}", report.summary.fields_checked);
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", report.summary.errors.to_string().red().bold());
    } else {
        println!("  Errors:   {}", report.summary.errors.to_string().green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", report.summary.warnings.to_string().yellow());
    } else {
        println!("  Warnings: {}", report.summary.warnings.to_string().green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    let models = model_entries(report);
    if !models.is_empty() {
        println!("{}", "Models:".bold());
        for model in &models {
            let status = if model.errors > 0 {
                "✗".red().bold()
            } else if model.warnings > 0 {
                "!".yellow().bold()
            } else {
                "✓".green().bold()
            };
            println!(
                "  {} {} ({} fields, {}) {}",
                status,
                model.name.bold(),
                model.fields,
                short_fingerprint(&model.fingerprint).dimmed(),
                model.file.dimmed()
            );
        }
        println!();
    }

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "By code:".bold());
        for (code, count) in code_counts(report) {
            println!("  {count:>4}  {code}");
        }
        println!();

        println!("{}", "Diagnostics:".bold());
        for (file, diags) in diagnostics_by_file(report) {
            println!("  {}", file.bold());
            for diag in diags {
                let severity_str = match diag.severity {
                    Severity::Error => "ERROR".red().bold(),
                    Severity::Warn => "WARN".yellow().bold(),
                    Severity::Info => "INFO".cyan(),
                };

                println!("    [{}] {}: {}", severity_str, diag.code, diag.message);
                if let Some(loc) = &diag.location {
                    println!("      at {}", loc.element);
                }
                if let Some(exp) = &diag.expected {
                    println!("      Expected: {exp}");
                }
                if let Some(act) = &diag.actual {
                    println!("      Actual:   {act}");
                }
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Model Validation Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Models checked: {}\n", report.summary.models_checked));
    md.push_str(&format!("- Fields checked: {}\n", report.summary.fields_checked));
    md.push_str(&format!("- Total diagnostics: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    let models = model_entries(report);
    if !models.is_empty() {
        md.push_str("## Models\n\n");
        md.push_str("| Model | File | Fields | Errors | Warnings | Fingerprint |\n");
        md.push_str("| --- | --- | ---: | ---: | ---: | --- |\n");
        for model in &models {
            md.push_str(&format!(
                "| {} | `{}` | {} | {} | {} | `{}` |\n",
                model.name,
                model.file,
                model.fields,
                model.errors,
                model.warnings,
                short_fingerprint(&model.fingerprint)
            ));
        }
        md.push('\n');
    }

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
        return md;
    }

    md.push_str("## Diagnostics by code\n\n");
    md.push_str("| Code | Count |\n| --- | ---: |\n");
    for (code, count) in code_counts(report) {
        md.push_str(&format!("| `{code}` | {count} |\n"));
    }
    md.push('\n');

    md.push_str("## Diagnostics\n\n");
    for (file, diags) in diagnostics_by_file(report) {
        md.push_str(&format!("### `{file}`\n\n"));
        for diag in diags {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };

            md.push_str(&format!("- {} **{}** `{}`", severity_emoji, diag.severity, diag.code));
            if let Some(loc) = diag.location.as_ref().filter(|loc| !loc.element.is_empty()) {
                md.push_str(&format!(" at `{}`", loc.element));
            }
            md.push_str(&format!(": {}\n", diag.message));

            if let Some(exp) = &diag.expected {
                md.push_str(&format!("  - Expected: `{exp}`\n"));
            }
            if let Some(act) = &diag.actual {
                md.push_str(&format!("  - Actual: `{act}`\n"));
            }
        }
        md.push('\n');
    }

    md
}
