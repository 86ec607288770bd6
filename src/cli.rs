//! Minimal CLI: decode documents against a shape → canonical JSON, or describe shapes
use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use json_shape::models::builtin_registry;
use json_shape::schema::json_schema;
use json_shape::{Codec, CodecOptions, ShapeFile, ShapeRegistry};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// decode JSON documents against declared record shapes and re-emit them canonically
#[derive(Parser, Debug)]
#[command(name = "json-shape", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// decode each input as the given type and print its canonical encoding
    Decode(DecodeOut),
    /// print the JSON Schema of a type
    Schema(SchemaOut),
    /// print every registered shape in shape-file form
    Shapes(ShapesOut),
}

#[derive(Args, Debug, Clone)]
struct ShapeSettings {
    /// shape file to load instead of the built-in models (Address, Person, Profile)
    #[arg(long)]
    shapes: Option<PathBuf>,
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

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct DecodeOut {
    #[command(flatten)]
    shape_settings: ShapeSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// shape name each document is decoded as
    #[arg(long = "type", short = 't')]
    type_name: String,

    /// cap nesting depth of records and arrays
    #[arg(long)]
    max_depth: Option<usize>,

    /// reject keys the shape does not declare
    #[arg(long, default_value_t = false)]
    deny_unknown_keys: bool,

    /// pretty-print decoded documents
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    shape_settings: ShapeSettings,

    /// root shape name
    #[arg(long = "type", short = 't')]
    type_name: String,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ShapesOut {
    #[command(flatten)]
    shape_settings: ShapeSettings,
}

/// One input document and where it came from.
struct Document {
    source: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ShapeSettings {
    fn load(&self) -> Result<(ShapeRegistry, CodecOptions)> {
        match self.shapes.as_ref() {
            Some(path) => {
                let file = ShapeFile::load(path)
                    .with_context(|| format!("failed to load shape file {}", path.display()))?;
                let (registry, options) = file.into_registry()
                    .with_context(|| format!("invalid shapes in {}", path.display()))?;
                tracing::info!(shapes = registry.len(), file = %path.display(), "loaded shape file");
                Ok((registry, options))
            }
            None => Ok((builtin_registry()?.clone(), CodecOptions::default())),
        }
    }
}

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_name = source_path.to_string_lossy().to_string();
            let source = read_source(&source_path)
                .with_context(|| format!("failed to read source file {source_name}"))?;
            for (source, json_value) in self.parse_source(&source_name, &source)? {
                self.select(source, json_value, &mut out)?;
            }
        }
        tracing::debug!(documents = out.len(), "loaded inputs");
        Ok(out)
    }

    fn parse_source(&self, source_name: &str, source: &str) -> Result<Vec<(String, Value)>> {
        if !self.ndjson {
            let json_value = serde_json::from_str::<Value>(source)
                .with_context(|| format!("failed to parse JSON source file ({source_name})"))?;
            return Ok(vec![(source_name.to_owned(), json_value)]);
        }
        source
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| -> Result<(String, Value)> {
                let name = format!("{source_name}:{}", i + 1);
                let json_value = serde_json::from_str::<Value>(line)
                    .with_context(|| format!("failed to parse NDJSON line ({name})"))?;
                Ok((name, json_value))
            })
            .collect()
    }

    /// Apply the JSON pointer, then the jq filter.
    fn select(&self, source: String, json_value: Value, out: &mut Vec<Document>) -> Result<()> {
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .with_context(|| format!("JSON pointer {pointer} selects nothing in {source}"))?,
        };
        let Some(jq_expr) = self.jq_expr.as_deref() else {
            out.push(Document { source, value: json_value });
            return Ok(());
        };
        let results = crate::jq_exec::run_jaq(jq_expr, &json_value)
            .with_context(|| format!("failed to apply jq expression to {source}"))?;
        tracing::debug!(source = %source, outputs = results.len(), "jq filter applied");
        let many = results.len() > 1;
        for (i, value) in results.into_iter().enumerate() {
            let source = if many { format!("{source}#{i}") } else { source.clone() };
            out.push(Document { source, value });
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Decode(target) => target.run(),
            Command::Schema(target) => {
                let (registry, _) = target.shape_settings.load()?;
                let schema = json_schema(&registry, &target.type_name)?;
                let schema_src = serde_json::to_string_pretty(&schema)?;
                write_output(target.out.as_ref(), &schema_src)
            }
            Command::Shapes(target) => {
                let (registry, options) = target.shape_settings.load()?;
                let file = ShapeFile::from_registry(&registry, options);
                println!("{}", serde_json::to_string_pretty(&file)?);
                Ok(())
            }
        }
    }
}

impl DecodeOut {
    fn run(&self) -> Result<()> {
        let (registry, file_options) = self.shape_settings.load()?;
        if !registry.contains(&self.type_name) {
            let known = registry.shapes().map(|s| s.name()).collect::<Vec<_>>().join(", ");
            bail!("unknown type `{}` (known: {known})", self.type_name);
        }
        let options = self.merge_options(file_options);

        let documents = self.input_settings.load_documents()?;
        let codec = Codec::new(&registry).with_options(options);

        // registry is read-only, so documents decode independently
        let results = documents
            .par_iter()
            .map(|doc| {
                let encoded = codec.decode(&doc.value, &self.type_name).and_then(|record| {
                    if self.pretty { codec.to_string_pretty(&record) } else { codec.to_string(&record) }
                });
                (doc.source.as_str(), encoded)
            })
            .collect::<Vec<_>>();

        let mut failed = 0usize;
        for (source, encoded) in &results {
            match encoded {
                Ok(text) => println!("{text}"),
                Err(error) => {
                    failed += 1;
                    eprintln!("{} {}: {error}", "✗".red().bold(), source.bold());
                }
            }
        }
        tracing::info!(total = results.len(), failed, type_name = %self.type_name, "decode finished");

        if failed > 0 {
            bail!("{failed} of {} documents failed to decode as `{}`", results.len(), self.type_name);
        }
        Ok(())
    }

    /// Command-line flags win over the shape file's `options`.
    fn merge_options(&self, mut options: CodecOptions) -> CodecOptions {
        if let Some(max_depth) = self.max_depth {
            options.max_depth = Some(max_depth);
        }
        if self.deny_unknown_keys {
            options.deny_unknown_keys = true;
        }
        options
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_source(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
}

fn write_output(out: Option<&PathBuf>, contents: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{contents}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
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
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                // an explicit glob that matched nothing is almost always a typo
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
