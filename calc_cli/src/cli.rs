//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use calc_core::presets::Tier;
use calc_core::ratio::RatioPreset;
use calc_core::units::LengthUnit;

/// Resimix - resin and varnish mix calculator
#[derive(Parser, Debug)]
#[command(name = "resimix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (prices, varnish yield, layer defaults)
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Project inputs shared by every subcommand.
///
/// Numbers are kept as raw text and coerced the same way the interactive
/// session coerces typed input.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Surface length
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub length: Option<String>,

    /// Surface width
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub width: Option<String>,

    /// Unit of length and width (m or cm)
    #[arg(long, global = true)]
    pub unit: Option<LengthUnit>,

    /// Base mix ratio (2:1, 1:1 or 3:1)
    #[arg(long, global = true)]
    pub ratio: Option<RatioPreset>,

    /// Preset layer stack (economy, mid or premium)
    #[arg(long, global = true, conflicts_with = "plan")]
    pub tier: Option<Tier>,

    /// JSON plan file with dimensions and layers
    #[arg(long, global = true, value_name = "JSON")]
    pub plan: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the per-layer breakdown and project totals
    Calc {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the application plan as PDF
    Export {
        /// Output path (defaults to resin_plan_<date>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the preset tiers
    Presets {
        /// Print the selected tier as a plan file
        #[arg(long)]
        json: bool,
    },

    /// Line-oriented session (the default)
    Interactive,
}
