//! Terminal output for the workbench state.

use std::fmt;

use serde::Serialize;

use calc_core::calculations::totals::{Breakdown, LayerBreakdown, ProjectTotals};
use calc_core::calculations::LayerMix;
use calc_core::dimensions::Dimensions;
use calc_core::layers::Layer;
use calc_core::session::Workbench;
use calc_core::units::{format_volume, format_weight};

/// `calc --json` payload.
#[derive(Debug, Serialize)]
pub struct CalcOutput<'a> {
    pub view: &'static str,
    pub dimensions: &'a Dimensions,
    pub layers: &'a [LayerBreakdown],
    pub totals: &'a ProjectTotals,
}

pub fn calc_json(bench: &Workbench, breakdown: &Breakdown) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CalcOutput {
        view: bench.active_view().label(),
        dimensions: bench.dimensions(),
        layers: &breakdown.layers,
        totals: &breakdown.totals,
    })
}

/// Dimensions, numbered layers with their mixes, and totals.
pub fn summary(bench: &Workbench) -> String {
    Summary(bench).to_string()
}

/// One line with the output surface: area, total mix and its A/B split.
pub fn status_line(bench: &Workbench) -> String {
    let totals = bench.totals();
    format!(
        "Area {:.2} m² | Total mix {} | A {} | B {}",
        totals.area_m2.value(),
        format_weight(totals.total_resin_mass.value()),
        format_weight(totals.component_a.value()),
        format_weight(totals.component_b.value())
    )
}

struct Summary<'a>(&'a Workbench);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bench = self.0;
        let breakdown = bench.breakdown();
        let dims = bench.dimensions();

        writeln!(f, "[{}]", bench.active_view().label())?;
        writeln!(
            f,
            "Surface: {} x {} {} = {} ({:.2} m²), base ratio {}",
            dims.length,
            dims.width,
            dims.unit,
            dims.raw_area_label(),
            dims.area_m2().value(),
            dims.ratio
        )?;
        writeln!(f)?;

        if breakdown.layers.is_empty() {
            writeln!(f, "  (no layers)")?;
        }
        for (index, (layer, entry)) in bench.layers().iter().zip(&breakdown.layers).enumerate() {
            write_layer(f, index + 1, layer, &entry.mix)?;
        }

        writeln!(f)?;
        write_totals(f, &breakdown.totals, &bench.settings().pricing.currency)
    }
}

fn write_layer(f: &mut fmt::Formatter<'_>, number: usize, layer: &Layer, mix: &LayerMix) -> fmt::Result {
    writeln!(
        f,
        "{:>2}. {} [{}] {} - {}",
        number,
        layer.name,
        layer.kind_tag(),
        layer.thickness_label(),
        mix.total_label()
    )?;
    let LayerMix::Resin(resin) = mix else {
        return Ok(());
    };

    writeln!(
        f,
        "    A {} / B {} ({}, {} g/m²/mm)",
        format_weight(resin.component_a.value()),
        format_weight(resin.component_b.value()),
        layer.ratio(),
        layer.consumption_rate()
    )?;
    if resin.quartz_weight.value() > 0.0 {
        writeln!(f, "    quartz {}", format_weight(resin.quartz_weight.value()))?;
    }
    for (c, color) in resin.colors.iter().enumerate() {
        writeln!(
            f,
            "    {}) {} {}% - {} (A {} / B {})",
            c + 1,
            color.name,
            color.percentage,
            format_weight(color.total.value()),
            format_weight(color.component_a.value()),
            format_weight(color.component_b.value())
        )?;
    }
    Ok(())
}

fn write_totals(f: &mut fmt::Formatter<'_>, totals: &ProjectTotals, currency: &str) -> fmt::Result {
    writeln!(f, "Area:          {:.2} m²", totals.area_m2.value())?;
    writeln!(f, "Total mix:     {}", format_weight(totals.total_resin_mass.value()))?;
    writeln!(f, "Component A:   {}", format_weight(totals.component_a.value()))?;
    writeln!(f, "Component B:   {}", format_weight(totals.component_b.value()))?;
    if totals.total_quartz_mass.value() > 0.0 {
        writeln!(f, "Quartz:        {}", format_weight(totals.total_quartz_mass.value()))?;
    }
    if totals.total_varnish_volume.value() > 0.0 {
        writeln!(f, "Varnish:       {}", format_volume(totals.total_varnish_volume.value()))?;
    }
    writeln!(f, "Est. cost:     {}{:.2}", currency, totals.estimated_cost)
}
