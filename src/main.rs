//! hdoc: generate documentation from annotated C header files.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `hdoc < geometry.h`
//! - **file mode**: `hdoc -o docs/api include/*.h`

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use hdoc::{compile, HeaderSource, Highlighter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hdoc",
    about = "Generate documentation from annotated C header files"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), html
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Permalink base template. Supports ${name} substitution,
    /// e.g. https://example.com/blob/main/include/${name}
    #[arg(long)]
    source_url: Option<String>,

    /// Header name used in stdin mode
    #[arg(long, default_value = "stdin.h")]
    name: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read one header from stdin, write its document to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let headers = [HeaderSource {
        name: cli.name.clone(),
        text: input,
        source_url: resolve_source_url(cli.source_url.as_deref(), &cli.name),
    }];
    let highlighter = Highlighter::new();
    let docs = compile(&headers, &highlighter)?;
    let renderer = render::create_renderer(&cli.format)?;
    for doc in &docs {
        print!("{}", renderer.render(doc)?);
    }
    Ok(())
}

/// file mode: compile all headers as one batch so cross-references resolve,
/// then write one document per header.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;
    if input_files.is_empty() {
        anyhow::bail!("no input files");
    }

    let mut headers = Vec::with_capacity(input_files.len());
    for path in &input_files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = header_name(path);
        let source_url = resolve_source_url(cli.source_url.as_deref(), &name);
        headers.push(HeaderSource {
            name,
            text,
            source_url,
        });
    }

    let highlighter = Highlighter::new();
    let docs = compile(&headers, &highlighter)?;

    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    for doc in &docs {
        let out_path = output_dir.join(format!("{}.{}", derive_output_name(&doc.name), ext));
        fs::write(&out_path, renderer.render(doc)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// File extensions recognized as header files.
const SUPPORTED_EXTENSIONS: &[&str] = &["h"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Display name of a header: its file name without the directory.
fn header_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Permalink base for one header. Without a template the header name itself
/// is used, which keeps links relative.
fn resolve_source_url(template: Option<&str>, name: &str) -> String {
    match template {
        Some(tpl) => tpl.replace("${name}", name),
        None => name.to_string(),
    }
}

/// Derive the output file name (without extension) from a header name.
/// "include/geometry.h" → "geometry"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit('/').next().unwrap_or(source);
    filename.strip_suffix(".h").unwrap_or(filename).to_string()
}
