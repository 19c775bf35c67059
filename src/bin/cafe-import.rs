//! CLI binary for cafe-import.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ImportConfig` and prints results.

use anyhow::{Context, Result};
use cafe_import::{
    canonicalize, import_file, read_lines, write_atomic, Allergen, AllergenLayout,
    AllergenMatcher, DocumentKind, ImportConfig, ImportOutput, ParsedDocument, PageSelection,
};
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Stock count from a PDF export (stdout)
  cafe-import --kind stock stock-take.pdf

  # Checklist as JSON, written to a file
  cafe-import --kind checklist --json closing.pdf -o closing.json

  # Allergen sheet already saved as CSV text
  cafe-import --kind allergens allergens.csv

  # Which allergens do these dishes carry?
  cafe-import --kind allergens allergens.pdf \
      --match "Ham & Cheddar Toastie" --match "Pesto pasta"

  # Sheet written "Milk, Nuts - Pesto"
  cafe-import --kind allergens --allergen-layout allergens-first sheet.pdf

  # Only pages 2-3, and show the raw lines the parsers would see
  cafe-import --kind stock --pages 2-3 --lines-only stock-take.pdf

INPUT FORMATS:
  Files starting with %PDF are read through pdfium; anything else is read
  as UTF-8 text, one record per line (this is how CSV allergen sheets are
  imported).

ENVIRONMENT VARIABLES:
  CAFE_IMPORT_KIND            Default for --kind
  CAFE_IMPORT_PAGES           Default for --pages
  CAFE_IMPORT_PASSWORD        PDF user password
  CAFE_IMPORT_LINE_TOLERANCE  Default for --line-tolerance
  CAFE_IMPORT_ALLERGEN_LAYOUT Default for --allergen-layout
  PDFIUM_LIB_PATH             Path to a libpdfium to load instead of the system one
  RUST_LOG                    Log filter, overrides -v / -q
"#;

/// Import stock sheets, checklists and allergen sheets from PDF or text.
#[derive(Parser, Debug)]
#[command(
    name = "cafe-import",
    version,
    about = "Import stock sheets, checklists and allergen sheets from PDF or text",
    long_about = "Read a stock sheet, opening/closing checklist or allergen reference sheet \
(PDF, plain text or CSV) and turn it into structured records. Allergen sheets can also be \
matched against dish names.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF, text or CSV file to import.
    input: PathBuf,

    /// What kind of sheet the input is.
    #[arg(short, long, env = "CAFE_IMPORT_KIND", value_enum)]
    kind: KindArg,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "CAFE_IMPORT_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON instead of a plain-text listing.
    #[arg(long, env = "CAFE_IMPORT_JSON")]
    json: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "CAFE_IMPORT_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "CAFE_IMPORT_PASSWORD")]
    password: Option<String>,

    /// Max vertical distance (PDF points) between text on the same line (0.5–50).
    #[arg(long, env = "CAFE_IMPORT_LINE_TOLERANCE", default_value_t = 5.0)]
    line_tolerance: f32,

    /// Which side of a dash holds the ingredient on allergen sheets.
    #[arg(
        long,
        env = "CAFE_IMPORT_ALLERGEN_LAYOUT",
        value_enum,
        default_value = "ingredient-first"
    )]
    allergen_layout: LayoutArg,

    /// Dish name to match against the allergen sheet (repeatable; allergens only).
    #[arg(long = "match", value_name = "DISH")]
    dishes: Vec<String>,

    /// Print the extracted lines and exit without parsing.
    #[arg(long)]
    lines_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CAFE_IMPORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CAFE_IMPORT_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Stock,
    Checklist,
    Allergens,
}

impl From<KindArg> for DocumentKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Stock => DocumentKind::Stock,
            KindArg::Checklist => DocumentKind::Checklist,
            KindArg::Allergens => DocumentKind::Allergens,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    IngredientFirst,
    AllergensFirst,
}

impl From<LayoutArg> for AllergenLayout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::IngredientFirst => AllergenLayout::IngredientFirst,
            LayoutArg::AllergensFirst => AllergenLayout::AllergensFirst,
        }
    }
}

/// One `--match` result.
#[derive(Debug, Serialize)]
struct DishMatch<'a> {
    dish: &'a str,
    allergens: BTreeSet<String>,
    /// Labels recognised as one of the fourteen regulated allergens.
    regulated: BTreeSet<Allergen>,
    /// Labels that are not.
    other: Vec<String>,
    ingredients: Vec<&'a str>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let kind = DocumentKind::from(cli.kind);
    if !cli.dishes.is_empty() && kind != DocumentKind::Allergens {
        anyhow::bail!("--match only applies to --kind allergens (got --kind {kind})");
    }

    let config = build_config(&cli)?;

    // ── Lines-only mode ──────────────────────────────────────────────────
    if cli.lines_only {
        let (lines, pages) = read_lines(&cli.input, &config)
            .with_context(|| format!("Failed to read lines from {}", cli.input.display()))?;
        let rendered = if cli.json {
            serde_json::to_string_pretty(&lines).context("Failed to serialise lines")? + "\n"
        } else {
            lines.iter().fold(String::new(), |mut out, l| {
                let _ = writeln!(out, "{l}");
                out
            })
        };
        emit(&cli, &rendered)?;
        if !cli.quiet {
            eprintln!("{} {} lines from {} pages", dim("·"), lines.len(), pages);
        }
        return Ok(());
    }

    // ── Run import ───────────────────────────────────────────────────────
    let output = import_file(&cli.input, kind, &config).context("Import failed")?;

    let rendered = if cli.dishes.is_empty() {
        render_output(&output, cli.json)?
    } else {
        render_matches(&output.document, &cli.dishes, cli.json)?
    };
    emit(&cli, &rendered)?;

    if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {} {} records  ({} lines skipped)  {}ms{}",
            green("✔"),
            bold(&stats.records.to_string()),
            kind,
            stats.skipped_lines(),
            stats.duration_ms,
            cli.output
                .as_ref()
                .map(|p| format!("  →  {}", bold(&p.display().to_string())))
                .unwrap_or_default(),
        );
    }

    Ok(())
}

/// Map CLI args to `ImportConfig`.
fn build_config(cli: &Cli) -> Result<ImportConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ImportConfig::builder()
        .line_tolerance(cli.line_tolerance)
        .pages(pages)
        .allergen_layout(cli.allergen_layout.into());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Write to `--output` (atomically) or stdout.
fn emit(cli: &Cli, rendered: &str) -> Result<()> {
    match cli.output {
        Some(ref path) => write_atomic(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")
        }
    }
}

fn render_output(output: &ImportOutput, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(output).context("Failed to serialise output")? + "\n");
    }

    let mut out = String::new();
    match &output.document {
        ParsedDocument::Stock(items) => {
            for item in items {
                let _ = match &item.unit {
                    Some(unit) => writeln!(out, "{:>5} {:<8} {}", item.qty, unit, item.name),
                    None => writeln!(out, "{:>5} {:<8} {}", item.qty, "", item.name),
                };
            }
        }
        ParsedDocument::Checklist(tasks) => {
            let mut current: Option<&Option<String>> = None;
            for task in tasks {
                if current != Some(&task.section) {
                    let heading = task.section.as_deref().unwrap_or("(no section)");
                    let _ = writeln!(out, "{}", bold(heading));
                    current = Some(&task.section);
                }
                let _ = writeln!(out, "  - {}", task.text);
            }
        }
        ParsedDocument::Allergens(map) => {
            for (ingredient, allergens) in map {
                let _ = writeln!(out, "{}: {}", ingredient, allergens.join(", "));
            }
        }
    }
    Ok(out)
}

fn render_matches(document: &ParsedDocument, dishes: &[String], json: bool) -> Result<String> {
    let ParsedDocument::Allergens(map) = document else {
        anyhow::bail!("--match needs an allergen sheet");
    };
    let matcher = AllergenMatcher::new(map);

    let results: Vec<DishMatch<'_>> = dishes
        .iter()
        .map(|dish| {
            let allergens = matcher.matches(dish);
            let (regulated, other) = canonicalize(&allergens);
            DishMatch {
                dish,
                ingredients: matcher.matching_ingredients(dish),
                allergens,
                regulated,
                other,
            }
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&results).context("Failed to serialise matches")? + "\n");
    }

    let mut out = String::new();
    for m in &results {
        let labels = if m.allergens.is_empty() {
            dim("none found")
        } else {
            m.allergens.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let _ = writeln!(out, "{}: {}", cyan(m.dish), labels);
        if !m.ingredients.is_empty() {
            let _ = writeln!(out, "  {}", dim(&format!("via {}", m.ingredients.join(", "))));
        }
    }
    Ok(out)
}

/// Parse `--pages` string into `PageSelection`: all, 5, 3-15, or 1,3,5,7.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();
    let page = |p: &str| {
        p.trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid page number: '{}'", p.trim()))
    };

    let selection = if s == "all" {
        PageSelection::All
    } else if let Some((start, end)) = s.split_once('-') {
        PageSelection::Range(page(start)?, page(end)?)
    } else if s.contains(',') {
        PageSelection::Set(s.split(',').map(page).collect::<Result<Vec<_>>>()?)
    } else {
        PageSelection::Single(page(&s)?)
    };

    // Only page 0 can be missing from an unbounded document.
    if let Some(p) = selection.first_missing(usize::MAX) {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
    }
    if let PageSelection::Range(start, end) = selection {
        if start > end {
            anyhow::bail!("Invalid page range '{start}-{end}': start must be <= end");
        }
    }

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_forms() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages(" 4 ").unwrap(), PageSelection::Single(4));
        assert_eq!(parse_pages("2-5").unwrap(), PageSelection::Range(2, 5));
        assert_eq!(parse_pages("1,3").unwrap(), PageSelection::Set(vec![1, 3]));
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-2").is_err());
        assert!(parse_pages("1,x").is_err());
        assert!(parse_pages("2,0").is_err());
        assert!(parse_pages("0-3").is_err());
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "cafe-import",
            "sheet.csv",
            "--kind",
            "allergens",
            "--match",
            "Pesto pasta",
            "--match",
            "Toastie",
            "--allergen-layout",
            "allergens-first",
        ])
        .unwrap();
        assert_eq!(cli.dishes.len(), 2);
        assert!(matches!(cli.allergen_layout, LayoutArg::AllergensFirst));
        assert!(matches!(cli.kind, KindArg::Allergens));
    }
}
