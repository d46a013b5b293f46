//! Minimal CLI: load a schema document → (validate | describe)
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use shapecheck::{NamedType, Schema, ValidationResult, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check JSON/NDJSON documents against named types from a schema document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and report the first failing field of each
    Validate(ValidateOut),
    /// print every type declared by the schema document
    Describe(DescribeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// schema document declaring the named types
    #[arg(long, short)]
    schema: PathBuf,

    /// type to validate against (the schema root if omitted)
    #[arg(long = "type", short = 't')]
    type_name: Option<String>,

    /// report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct DescribeOut {
    /// schema document declaring the named types
    #[arg(long, short)]
    schema: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

/// One input document, labelled with where it came from.
#[derive(Debug)]
struct Document {
    label: String,
    value: serde_json::Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            for (line_number, json_value) in self.parse_source(&source, &source_path_str)? {
                let label = if self.ndjson { format!("{source_path_str}:{line_number}") } else { source_path_str.clone() };
                for (n, value) in self.select(json_value, &label)?.into_iter().enumerate() {
                    let label = if n == 0 { label.clone() } else { format!("{label}#{n}") };
                    documents.push(Document { label, value });
                }
            }
        }
        tracing::debug!(documents = documents.len(), "loaded input documents");
        Ok(documents)
    }

    /// Parsed documents paired with the 1-based source line they start on.
    /// Blank NDJSON lines are skipped but still counted.
    fn parse_source(&self, source: &str, source_path_str: &str) -> Result<Vec<(usize, serde_json::Value)>> {
        if !self.ndjson {
            let json_value = serde_json::from_str::<serde_json::Value>(source)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            return Ok(vec![(1, json_value)]);
        }
        source
            .lines()
            .enumerate()
            .map(|(ix, line)| (ix + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_number, line)| -> Result<(usize, serde_json::Value)> {
                let json_value = serde_json::from_str::<serde_json::Value>(line).with_context(|| {
                    format!("failed to parse NDJSON line {line_number} ({source_path_str})")
                })?;
                Ok((line_number, json_value))
            })
            .collect()
    }

    /// Apply the JSON pointer, then the jq filter.
    fn select(&self, json_value: serde_json::Value, label: &str) -> Result<Vec<serde_json::Value>> {
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => match json_value.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("JSON pointer {pointer} selects nothing in {label}"),
            },
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![json_value]),
            Some(jq_expr) => crate::jq_exec::select_documents(jq_expr, &json_value)
                .with_context(|| format!("failed to apply jq expression to {label}")),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns whether every document passed.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Validate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true);
                }
                let schema = load_schema(&target.schema)?;
                let named_type = pick_type(&schema, target.type_name.as_deref())?;
                let documents = target.input_settings.load_documents()?;

                let results: Vec<(Document, ValidationResult)> = documents
                    .into_par_iter()
                    .map(|document| {
                        let result = named_type.validate(&Value::from(&document.value));
                        (document, result)
                    })
                    .collect();

                let failures = results.iter().filter(|(_, result)| !result.success).count();
                for (document, result) in &results {
                    report(target.format, document, result)?;
                }
                if target.format == ReportFormat::Text {
                    let summary = format!("{} documents, {} failed", results.len(), failures);
                    if failures == 0 {
                        eprintln!("{}", summary.green());
                    } else {
                        eprintln!("{}", summary.red());
                    }
                }
                Ok(failures == 0)
            }
            Command::Describe(target) => {
                let schema = load_schema(&target.schema)?;
                for named_type in schema.types() {
                    println!("{named_type}");
                }
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_schema(path: &Path) -> Result<Schema> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file ({})", path.display()))?;
    let schema = source
        .parse::<Schema>()
        .with_context(|| format!("invalid schema document ({})", path.display()))?;
    tracing::debug!(types = schema.len(), path = %path.display(), "loaded schema");
    Ok(schema)
}

fn pick_type<'a>(schema: &'a Schema, name: Option<&str>) -> Result<&'a NamedType> {
    match name {
        Some(name) => schema
            .get(name)
            .with_context(|| format!("schema declares no type named `{name}`")),
        None => schema.root().context("schema declares no types"),
    }
}

fn report(format: ReportFormat, document: &Document, result: &ValidationResult) -> Result<()> {
    match format {
        ReportFormat::Text => {
            if result.success {
                println!("{} {}", "ok".green(), document.label);
            } else {
                let message = result.message.as_deref().unwrap_or("validation failed");
                println!("{} {}: {}", "FAIL".red().bold(), document.label, message);
            }
        }
        ReportFormat::Json => {
            let line = serde_json::json!({
                "document": document.label,
                "result": result,
            });
            println!("{}", serde_json::to_string(&line)?);
        }
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
