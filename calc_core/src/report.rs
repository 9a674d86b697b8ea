//! # Report Exporter
//!
//! Turns the current layer stack, dimensions and totals into a structured,
//! printable document. The [`Report`] is renderer-agnostic: the [`pdf`]
//! module compiles it to PDF, and its `Display` impl prints it as a plain
//! text table.
//!
//! The table has one row per layer and, for resin layers, one indented
//! sub-row per color. The summary repeats the project totals in kilograms.
//!
//! [`pdf`]: crate::pdf

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculations::mix::{self, LayerMix};
use crate::calculations::totals::ProjectTotals;
use crate::dimensions::Dimensions;
use crate::layers::Layer;
use crate::settings::CalcSettings;
use crate::units::{format_weight, Kilograms, Liters};

/// Report title
pub const REPORT_TITLE: &str = "Resin Application Plan";

/// A complete report, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub date: NaiveDate,

    /// Metadata block lines (project size, base ratio)
    pub metadata: Vec<String>,

    /// Column headers: layer, type, thickness, A, B, total.
    /// A and B follow each resin row's own ratio, shown in its type cell.
    pub headers: [String; 6],

    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

/// Whether a row describes a layer or a color inside the layer above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Layer,
    Color,
}

/// One table row, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub kind: RowKind,
    pub label: String,
    pub type_label: String,
    pub thickness: String,
    pub component_a: String,
    pub component_b: String,
    pub total: String,
}

impl ReportRow {
    fn cells(&self) -> [&str; 6] {
        [
            &self.label,
            &self.type_label,
            &self.thickness,
            &self.component_a,
            &self.component_b,
            &self.total,
        ]
    }
}

/// Closing summary block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_resin: Kilograms,
    pub component_a: Kilograms,
    pub component_b: Kilograms,
    pub total_quartz: Kilograms,
    pub total_varnish: Liters,
    pub estimated_cost: f64,
    pub currency: String,
}

impl ReportSummary {
    /// Summary as display lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total resin: {:.2} kg", self.total_resin.value()),
            format!("Component A: {:.2} kg", self.component_a.value()),
            format!("Component B: {:.2} kg", self.component_b.value()),
        ];
        if self.total_quartz.value() > 0.0 {
            lines.push(format!("Quartz: {:.2} kg", self.total_quartz.value()));
        }
        if self.total_varnish.value() > 0.0 {
            lines.push(format!("Total varnish: {:.2} L", self.total_varnish.value()));
        }
        lines.push(format!("Estimated cost: {}{:.2}", self.currency, self.estimated_cost));
        lines
    }
}

impl Report {
    /// Suggested download name, e.g. `resin_plan_2026-10-16.pdf`.
    pub fn file_name(&self) -> String {
        format!("resin_plan_{}.pdf", self.date.format("%Y-%m-%d"))
    }
}

/// Build the report for the current snapshot.
///
/// Row quantities are re-derived per layer with the same formulas as the
/// totals; `totals` supplies the summary block.
pub fn build_report(
    layers: &[Layer],
    dimensions: &Dimensions,
    totals: &ProjectTotals,
    settings: &CalcSettings,
    date: NaiveDate,
) -> Report {
    let area = dimensions.area_m2();
    let unit = dimensions.unit.symbol();

    let metadata = vec![
        format!("Date: {}", date.format("%Y-%m-%d")),
        format!(
            "Project: {}{unit} x {}{unit} (Area: {:.2} m²)",
            dimensions.length,
            dimensions.width,
            area.value()
        ),
        format!("Base mix ratio: {}", dimensions.ratio),
    ];

    let headers = [
        "Layer / Mix".to_string(),
        "Type".to_string(),
        "Thk.".to_string(),
        "A".to_string(),
        "B".to_string(),
        "Total".to_string(),
    ];

    let mut rows = Vec::new();
    for layer in layers {
        let layer_mix = mix::calculate(layer, area, &settings.varnish);
        match &layer_mix {
            LayerMix::Resin(resin) => {
                rows.push(ReportRow {
                    kind: RowKind::Layer,
                    label: layer.name.clone(),
                    type_label: format!("{} {}", layer.kind_tag(), layer.ratio()),
                    thickness: layer.thickness_label(),
                    component_a: format_weight(resin.component_a.value()),
                    component_b: format_weight(resin.component_b.value()),
                    total: layer_mix.total_label(),
                });
                for color in &resin.colors {
                    rows.push(ReportRow {
                        kind: RowKind::Color,
                        label: format!("• {} ({}%)", color.name, color.percentage),
                        type_label: String::new(),
                        thickness: String::new(),
                        component_a: format_weight(color.component_a.value()),
                        component_b: format_weight(color.component_b.value()),
                        total: format_weight(color.total.value()),
                    });
                }
            }
            LayerMix::Varnish(_) => rows.push(ReportRow {
                kind: RowKind::Layer,
                label: layer.name.clone(),
                type_label: layer.kind_tag().label().to_string(),
                thickness: layer.thickness_label(),
                component_a: "-".to_string(),
                component_b: "-".to_string(),
                total: layer_mix.total_label(),
            }),
        }
    }

    let summary = ReportSummary {
        total_resin: totals.total_resin_mass.into(),
        component_a: totals.component_a.into(),
        component_b: totals.component_b.into(),
        total_quartz: totals.total_quartz_mass.into(),
        total_varnish: totals.total_varnish_volume.into(),
        estimated_cost: totals.estimated_cost,
        currency: settings.pricing.currency.clone(),
    };

    Report {
        title: REPORT_TITLE.to_string(),
        date,
        metadata,
        headers,
        rows,
        summary,
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        for line in &self.metadata {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;

        let mut widths = self.headers.clone().map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        write_table_line(f, &headers, &widths)?;
        let rule: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
        writeln!(f, "{}", "-".repeat(rule))?;
        for row in &self.rows {
            write_table_line(f, &row.cells(), &widths)?;
        }

        writeln!(f)?;
        writeln!(f, "Material summary:")?;
        for line in self.summary.lines() {
            writeln!(f, "  - {}", line)?;
        }
        Ok(())
    }
}

fn write_table_line(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            // First column is left-aligned, quantities right-aligned
            if i == 0 {
                format!("{}{}", cell, " ".repeat(pad))
            } else {
                format!("{}{}", " ".repeat(pad), cell)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(f, "{}", line.trim_end())
}
