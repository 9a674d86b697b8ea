//! One-shot command implementations.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use calc_core::pdf::render_report_pdf;
use calc_core::plan::Plan;
use calc_core::presets::Tier;
use calc_core::session::{ViewKey, Workbench};
use calc_core::settings::CalcSettings;

use crate::cli::InputArgs;
use crate::render;

/// Build the workbench from `--plan` or `--tier`, then apply dimension flags.
pub fn build_workbench(input: &InputArgs, settings: CalcSettings) -> Result<Workbench> {
    let mut bench = match &input.plan {
        Some(path) => {
            let plan = Plan::load(path).with_context(|| format!("failed to read plan {}", path.display()))?;
            Workbench::with_plan(settings, plan)
        }
        None => {
            let mut bench = Workbench::new(settings);
            bench.select(ViewKey::Tier(input.tier.unwrap_or_default()));
            bench
        }
    };

    if let Some(length) = &input.length {
        bench.set_length_text(length);
    }
    if let Some(width) = &input.width {
        bench.set_width_text(width);
    }
    if let Some(unit) = input.unit {
        bench.set_unit(unit);
    }
    if let Some(ratio) = input.ratio {
        bench.set_ratio(ratio);
    }
    Ok(bench)
}

/// `calc`: breakdown and totals, as text or JSON.
pub fn calc(bench: &Workbench, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let breakdown = bench.breakdown();
        let text = render::calc_json(bench, &breakdown).context("failed to serialize totals")?;
        writeln!(out, "{}", text)?;
    } else {
        write!(out, "{}", render::summary(bench))?;
    }
    Ok(())
}

/// Build the report and write it as PDF. Returns the written path.
pub fn export_pdf(bench: &mut Workbench, output: Option<&Path>, date: NaiveDate) -> Result<Option<PathBuf>> {
    let request = bench.request_export();
    let Some(report) = bench.export(request, date) else {
        return Ok(None);
    };

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(report.file_name()));
    let bytes = render_report_pdf(&report).context("failed to render report")?;
    fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = bytes.len(), "exported report");
    Ok(Some(path))
}

/// `presets`: list every tier, or print one tier as a plan file.
pub fn presets(tier: Option<Tier>, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let plan = Plan::from_tier(tier.unwrap_or_default());
        writeln!(out, "{}", plan.to_json()?)?;
        return Ok(());
    }

    let tiers = match tier {
        Some(tier) => vec![tier],
        None => Tier::ALL.to_vec(),
    };
    for tier in tiers {
        writeln!(out, "{}", tier)?;
        for layer in tier.seed_layers() {
            let quartz = layer
                .resin_spec()
                .and_then(|spec| spec.quartz_percentage)
                .map(|pct| format!(", quartz {}%", pct))
                .unwrap_or_default();
            writeln!(
                out,
                "  - {} ({}, {}, {} @ {} g/m²/mm{})",
                layer.name,
                layer.kind_tag(),
                layer.thickness_label(),
                layer.ratio(),
                layer.consumption_rate(),
                quartz
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::ratio::RatioPreset;
    use calc_core::units::LengthUnit;

    fn inputs(length: &str, width: &str) -> InputArgs {
        InputArgs {
            length: Some(length.to_string()),
            width: Some(width.to_string()),
            ..InputArgs::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_build_defaults_to_economy() {
        let bench = build_workbench(&inputs("4", "3"), CalcSettings::default()).unwrap();
        assert_eq!(bench.active_view(), ViewKey::Tier(Tier::Economy));
        assert_eq!(bench.totals().total_resin_mass.value(), 42_000.0);
    }

    #[test]
    fn test_build_coerces_and_applies_flags() {
        let args = InputArgs {
            unit: Some(LengthUnit::Centimeter),
            ratio: Some(RatioPreset::OneToOne),
            tier: Some(Tier::Premium),
            ..inputs("400abc", "nope")
        };
        let bench = build_workbench(&args, CalcSettings::default()).unwrap();
        assert_eq!(bench.dimensions().length, 400.0);
        assert_eq!(bench.dimensions().width, 0.0);
        assert_eq!(bench.dimensions().unit, LengthUnit::Centimeter);
        assert_eq!(bench.dimensions().ratio, RatioPreset::OneToOne);
        assert_eq!(bench.active_view(), ViewKey::Tier(Tier::Premium));
    }

    #[test]
    fn test_build_from_plan_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(&path, Plan::from_tier(Tier::Mid).to_json().unwrap()).unwrap();

        let args = InputArgs {
            plan: Some(path),
            ..inputs("4", "3")
        };
        let bench = build_workbench(&args, CalcSettings::default()).unwrap();
        assert_eq!(bench.active_view(), ViewKey::Plan);
        assert_eq!(bench.layers().len(), 4);
        assert_eq!(bench.dimensions().area_m2().value(), 12.0);
    }

    #[test]
    fn test_missing_plan_is_error() {
        let args = InputArgs {
            plan: Some(PathBuf::from("/nonexistent/plan.json")),
            ..InputArgs::default()
        };
        assert!(build_workbench(&args, CalcSettings::default()).is_err());
    }

    #[test]
    fn test_calc_text_and_json() {
        let bench = build_workbench(&inputs("4", "3"), CalcSettings::default()).unwrap();

        let mut text = Vec::new();
        calc(&bench, false, &mut text).unwrap();
        assert!(String::from_utf8(text).unwrap().contains("Total mix:     42.00 kg"));

        let mut json = Vec::new();
        calc(&bench, true, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["totals"]["component_a"], 28_000.0);
    }

    #[test]
    fn test_presets_listing() {
        let mut out = Vec::new();
        presets(None, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Economy\n"));
        assert!(text.contains("  - Base coat (Resin, 1 mm, 2:1 @ 1000 g/m²/mm, quartz 40%)"));
        assert!(text.contains("  - Sealer (second coat) (Varnish, 0.5 coats, 1:1 @ 150 g/m²/mm)"));
    }

    #[test]
    fn test_presets_json_is_a_plan() {
        let mut out = Vec::new();
        presets(Some(Tier::Premium), true, &mut out).unwrap();
        let plan = Plan::from_json(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(plan.layers.len(), 5);
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.pdf");
        let mut bench = build_workbench(&inputs("4", "3"), CalcSettings::default()).unwrap();

        let written = export_pdf(&mut bench, Some(&path), date()).unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
