//! # PDF Generation Module
//!
//! Renders a [`Report`] to PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Report data is escaped and injected via placeholder replacement
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`); writing them is up to the caller
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::calculations::totals::aggregate;
//! use calc_core::dimensions::Dimensions;
//! use calc_core::pdf::render_report_pdf;
//! use calc_core::presets::Tier;
//! use calc_core::report::build_report;
//! use calc_core::settings::CalcSettings;
//! use calc_core::units::LengthUnit;
//!
//! let settings = CalcSettings::default();
//! let dims = Dimensions::new(4.0, 3.0, LengthUnit::Meter);
//! let layers = Tier::Mid.seed_layers();
//! let totals = aggregate(&layers, dims.area_m2(), &settings);
//! let today = chrono::Local::now().date_naive();
//!
//! let report = build_report(&layers, &dims, &totals, &settings, today);
//! let pdf_bytes = render_report_pdf(&report).unwrap();
//! std::fs::write(report.file_name(), pdf_bytes).unwrap();
//! ```

use chrono::Datelike;
use once_cell::sync::Lazy;
use tracing::info;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{CalcError, CalcResult};
use crate::report::{Report, RowKind};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed on first use.
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Library (standard functions)
    library: LazyHash<Library>,
    /// Date reported by `datetime.today()`
    today: Option<Datetime>,
}

impl PdfWorld {
    fn new(source: String, today: Option<Datetime>) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
            today,
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        self.today
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the resin application plan
const REPORT_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 1.5cm, right: 1.5cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt)[{{TITLE}} - {{DATE}}]],
      align(right)[#text(size: 8pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10pt)

#text(size: 22pt, weight: "bold", fill: rgb("#0f766e"))[{{TITLE}}]

#v(6pt)

#text(size: 10pt, fill: gray)[
{{METADATA}}
]

#v(12pt)

#table(
  columns: (1fr, auto, auto, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt + gray,
  align: (left, center, center, center, center, right),
  fill: (_, y) => if y == 0 { rgb("#0f766e") },
  table.header({{HEADERS}}),
{{ROWS}}
)

#v(16pt)

#text(size: 14pt, weight: "bold")[Material summary]

#v(4pt)

{{SUMMARY}}
"##;

// ============================================================================
// PDF Rendering
// ============================================================================

/// Render a report to PDF bytes.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::RenderFailed)` - If Typst compilation or PDF export fails
pub fn render_report_pdf(report: &Report) -> CalcResult<Vec<u8>> {
    let source = report_source(report);

    let today = Datetime::from_ymd(
        report.date.year(),
        report.date.month() as u8,
        report.date.day() as u8,
    );
    let world = PdfWorld::new(source, today);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    info!(rows = report.rows.len(), bytes = pdf_bytes.len(), "rendered report pdf");
    Ok(pdf_bytes)
}

/// Fill the template with escaped report data.
fn report_source(report: &Report) -> String {
    let metadata = report
        .metadata
        .iter()
        .map(|line| escape_typst(line))
        .collect::<Vec<_>>()
        .join(" \\\n");

    let headers = report
        .headers
        .iter()
        .map(|h| format!("[#text(fill: white, weight: \"bold\")[{}]]", escape_typst(h)))
        .collect::<Vec<_>>()
        .join(", ");

    let summary = report
        .summary
        .lines()
        .iter()
        .map(|line| format!("- {}", escape_typst(line)))
        .collect::<Vec<_>>()
        .join("\n");

    let title = escape_typst(&report.title);
    let date = escape_typst(&report.date.format("%Y-%m-%d").to_string());
    let rows = build_rows(report);

    fill_template(REPORT_TEMPLATE, |name| match name {
        "TITLE" => Some(title.as_str()),
        "DATE" => Some(date.as_str()),
        "METADATA" => Some(metadata.as_str()),
        "HEADERS" => Some(headers.as_str()),
        "ROWS" => Some(rows.as_str()),
        "SUMMARY" => Some(summary.as_str()),
        _ => None,
    })
}

/// Substitute `{{NAME}}` placeholders in one pass over the template.
/// Inserted values are never scanned again; unknown names are kept as-is.
fn fill_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}").and_then(|end| lookup(&after[..end]).map(|value| (end, value))) {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build the table body: bold layer rows, small grey color rows.
fn build_rows(report: &Report) -> String {
    report
        .rows
        .iter()
        .map(|row| match row.kind {
            RowKind::Layer => format!(
                "  [*{}*], [{}], [{}], [{}], [{}], [*{}*],",
                escape_typst(&row.label),
                escape_typst(&row.type_label),
                escape_typst(&row.thickness),
                escape_typst(&row.component_a),
                escape_typst(&row.component_b),
                escape_typst(&row.total),
            ),
            RowKind::Color => format!(
                "  [#h(8pt)#text(size: 8pt, fill: gray)[{}]], [], [], [#text(size: 8pt, fill: gray)[{}]], [#text(size: 8pt, fill: gray)[{}]], [#text(size: 8pt, fill: gray)[{}]],",
                escape_typst(&row.label),
                escape_typst(&row.component_a),
                escape_typst(&row.component_b),
                escape_typst(&row.total),
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape special Typst markup characters in user-provided text
fn escape_typst(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '*' | '_'
                | '#'
                | '$'
                | '@'
                | '<'
                | '>'
                | '\\'
                | '`'
                | '['
                | ']'
                | '{'
                | '}'
                | '='
                | '-'
                | '+'
                | '/'
                | '~'
                | '"'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::totals::aggregate;
    use crate::dimensions::Dimensions;
    use crate::presets::Tier;
    use crate::report::build_report;
    use crate::settings::CalcSettings;
    use crate::units::LengthUnit;
    use chrono::NaiveDate;

    fn premium_report() -> Report {
        let settings = CalcSettings::default();
        let dims = Dimensions::new(4.0, 3.0, LengthUnit::Meter);
        let mut layers = Tier::Premium.seed_layers();
        layers[1] = layers[1].clone().with_color("Slate [grey] #2", 15.0);
        let totals = aggregate(&layers, dims.area_m2(), &settings);
        build_report(&layers, &dims, &totals, &settings, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("plain text"), "plain text");
        assert_eq!(escape_typst("#1 [a]"), "\\#1 \\[a\\]");
        assert_eq!(escape_typst("$45.00"), "\\$45.00");
        assert_eq!(escape_typst("a-b"), "a\\-b");
        assert_eq!(escape_typst("{{x}}"), "\\{\\{x\\}\\}");
    }

    #[test]
    fn test_fill_template_single_pass() {
        let filled = fill_template("[{{A}}] [{{B}}] {{C}}", |name| match name {
            "A" => Some("{{B}}"),
            "B" => Some("b"),
            _ => None,
        });
        assert_eq!(filled, "[{{B}}] [b] {{C}}");
    }

    fn report_with_layer_named(name: &str) -> Report {
        let settings = CalcSettings::default();
        let dims = Dimensions::new(4.0, 3.0, LengthUnit::Meter);
        let mut layers = Tier::Economy.seed_layers();
        layers[0].name = name.to_string();
        let totals = aggregate(&layers, dims.area_m2(), &settings);
        build_report(&layers, &dims, &totals, &settings, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    #[test]
    fn test_placeholder_in_layer_name_stays_literal() {
        let report = report_with_layer_named("{{SUMMARY}}");
        let source = report_source(&report);
        assert!(source.contains("[*\\{\\{SUMMARY\\}\\}*]"));
        assert_eq!(source.matches("- Total resin:").count(), 1);

        let pdf = render_report_pdf(&report);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
    }

    #[test]
    fn test_braces_in_names_render() {
        let pdf = render_report_pdf(&report_with_layer_named("Top {coat} }{"));
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
    }

    #[test]
    fn test_source_contains_escaped_rows() {
        let source = report_source(&premium_report());
        assert!(source.contains("Resin Application Plan"));
        assert!(source.contains("Slate \\[grey\\] \\#2"));
        assert!(source.contains("Sealer (second coat)"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_report_pdf(&premium_report());

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
