use anyhow::{Context, Result};
use clap::Args;
use semdiff_core::{
    structural_diff, AstLeafSource, DiffDocument, DiffOptions, Language, NormalizerSettings,
};
use semdiff_parsers::{ParseInput, ParseOutput, ParserRegistry};
use std::fs;
use std::path::{Path, PathBuf};

use crate::input::{read_source, DEFAULT_MAX_BYTES};
use crate::render;

#[derive(Args, Debug)]
pub struct Command {
    /// Original version of the file
    #[arg(value_name = "OLD")]
    old: PathBuf,

    /// Changed version of the file
    #[arg(value_name = "NEW")]
    new: PathBuf,

    /// Language id (ts, tsx, js, jsx, json, css, python, go, rust, markdown).
    /// Detected from the file extension when omitted.
    #[arg(long, value_name = "ID")]
    language: Option<Language>,

    /// Normalizer settings as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not detect moved blocks
    #[arg(long)]
    no_moves: bool,

    /// Skip parsing and diff by lexer and lines only
    #[arg(long)]
    plain: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Refuse inputs larger than this many bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_BYTES)]
    max_bytes: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

pub fn handler(args: &Command) -> Result<()> {
    let doc = run(args)?;
    print!("{}", format_document(&doc, args.format)?);
    Ok(())
}

/// Read, parse and diff the two inputs.
pub fn run(args: &Command) -> Result<DiffDocument> {
    let old_text = read_source(&args.old, args.max_bytes)?;
    let new_text = read_source(&args.new, args.max_bytes)?;

    let language = args
        .language
        .or_else(|| Language::from_path(&args.old))
        .or_else(|| Language::from_path(&args.new));
    let normalizers = match &args.config {
        Some(path) => load_settings(path)?,
        None => NormalizerSettings::default(),
    };
    log::debug!(
        "diffing {} -> {} as {}",
        args.old.display(),
        args.new.display(),
        language.map_or("plain text", |l| l.as_str())
    );

    let (old_parse, new_parse) = if args.plain {
        (ParseOutput::plain(language), ParseOutput::plain(language))
    } else {
        let registry = ParserRegistry::default_ref();
        (
            registry.parse(&ParseInput::new(&old_text).with_language(language)),
            registry.parse(&ParseInput::new(&new_text).with_language(language)),
        )
    };

    let options = DiffOptions::default()
        .with_language(language)
        .with_normalizers(normalizers)
        .with_move_detection(!args.no_moves)
        .with_roots(root(&old_parse), root(&new_parse))
        .with_token_ranges(old_parse.token_ranges(), new_parse.token_ranges());
    Ok(structural_diff(&old_text, &new_text, &options))
}

pub fn format_document(doc: &DiffDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(doc).context("Failed to serialize diff document")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Summary => Ok(render::summary(doc)),
    }
}

fn load_settings(path: &Path) -> Result<NormalizerSettings> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    NormalizerSettings::from_json_str(&json)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn root(output: &ParseOutput) -> Option<&dyn AstLeafSource> {
    output.root.as_ref().map(|r| r as &dyn AstLeafSource)
}
