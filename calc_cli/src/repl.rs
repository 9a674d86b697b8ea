//! Interactive session.
//!
//! Reads one command per line, applies it to the workbench and prints the
//! updated totals. Layers and colors are addressed by their 1-based position
//! as shown by `show`. A failing command prints its error and the session
//! carries on.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use uuid::Uuid;

use calc_core::input::coerce_number;
use calc_core::layers::{ColorEdit, LayerEdit};
use calc_core::presets::Tier;
use calc_core::ratio::RatioPreset;
use calc_core::session::{ViewKey, Workbench};
use calc_core::units::LengthUnit;

use crate::commands;
use crate::render;

const HELP: &str = "\
Commands:
  dim <length> <width>           set both dimensions
  length <value> | width <value> set one dimension
  unit m|cm                      unit of length and width
  ratio 2:1|1:1|3:1              base mix ratio for new layers
  tier economy|mid|premium|plan  switch layer stack
  add                            append a default resin layer
  rm <layer>                     remove a layer
  set <layer> <field> <value>    edit name, thickness, rate, ratio, quartz or kind
  kind <layer> resin|varnish     change a layer's kind
  color add <layer> <pct> <name> add a color to a resin layer
  color rm <layer> <color>       remove a color
  color set <layer> <color> name|pct <value>
  show                           print layers and totals
  export [path]                  write the PDF report
  reset                          clear dimensions and restore preset layers
  help                           this text
  quit                           leave the session";

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    bench: Workbench,
}

impl Repl {
    pub fn new(bench: Workbench) -> Self {
        Repl { bench }
    }

    pub fn bench(&self) -> &Workbench {
        &self.bench
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self, mut input: impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(out, "resimix - type 'help' for commands")?;
        write!(out, "{}", render::summary(&self.bench))?;

        let mut line = String::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line).context("failed to read input")? == 0 {
                writeln!(out)?;
                break;
            }

            match self.execute(&line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {:#}", e)?,
            }
        }
        Ok(())
    }

    /// Apply one command line.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.to_ascii_lowercase().as_str() {
            "dim" => {
                let &[length, width] = args else {
                    bail!("usage: dim <length> <width>");
                };
                self.bench.set_length_text(length);
                self.bench.set_width_text(width);
            }
            "length" => self.bench.set_length_text(args.first().copied().unwrap_or("")),
            "width" => self.bench.set_width_text(args.first().copied().unwrap_or("")),
            "unit" => {
                let unit: LengthUnit = single(args, "unit m|cm")?.parse()?;
                self.bench.set_unit(unit);
            }
            "ratio" => {
                let ratio: RatioPreset = single(args, "ratio 2:1|1:1|3:1")?.parse()?;
                self.bench.set_ratio(ratio);
            }
            "tier" => {
                let raw = single(args, "tier economy|mid|premium|plan")?;
                let key = if raw.eq_ignore_ascii_case("plan") {
                    ViewKey::Plan
                } else {
                    ViewKey::Tier(raw.parse::<Tier>()?)
                };
                if !self.bench.select(key) {
                    bail!("no plan loaded; start with --plan <file>");
                }
                write!(out, "{}", render::summary(&self.bench))?;
                return Ok(Flow::Continue);
            }
            "add" => {
                self.bench.add_layer();
                writeln!(out, "added layer {}", self.bench.layers().len())?;
            }
            "rm" => {
                let id = self.layer_id(args.first())?;
                let removed = self.bench.remove_layer(id)?;
                writeln!(out, "removed {}", removed.name)?;
            }
            "set" => {
                if args.len() < 2 {
                    bail!("usage: set <layer> <field> <value>");
                }
                let id = self.layer_id(args.first())?;
                let edit = LayerEdit::from_field(args[1], &args[2..].join(" "))?;
                self.bench.update_layer(id, edit)?;
            }
            "kind" => {
                let &[layer, kind] = args else {
                    bail!("usage: kind <layer> resin|varnish");
                };
                let id = self.layer_id(Some(&layer))?;
                self.bench.update_layer(id, LayerEdit::Kind(kind.parse()?))?;
            }
            "color" => self.color(args, out)?,
            "show" => {
                write!(out, "{}", render::summary(&self.bench))?;
                return Ok(Flow::Continue);
            }
            "export" => {
                let today = Local::now().date_naive();
                if let Some(path) = commands::export_pdf(&mut self.bench, args.first().map(|p| Path::new(*p)), today)? {
                    writeln!(out, "wrote {}", path.display())?;
                }
                return Ok(Flow::Continue);
            }
            "reset" => self.bench.reset_all(),
            "help" | "?" => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => bail!("unknown command '{}', type 'help'", other),
        }

        writeln!(out, "{}", render::status_line(&self.bench))?;
        Ok(Flow::Continue)
    }

    fn color(&mut self, args: &[&str], out: &mut impl Write) -> Result<()> {
        match args {
            ["add", layer, pct, name @ ..] => {
                let layer_id = self.layer_id(Some(layer))?;
                let name = if name.is_empty() { "Color".to_string() } else { name.join(" ") };
                self.bench.add_color(layer_id, name, coerce_number(pct))?;
                writeln!(out, "added color")?;
            }
            ["rm", layer, color] => {
                let layer_id = self.layer_id(Some(layer))?;
                let color_id = self.color_id(layer_id, color)?;
                let removed = self.bench.remove_color(layer_id, color_id)?;
                writeln!(out, "removed color {}", removed.name)?;
            }
            ["set", layer, color, field, value @ ..] => {
                let layer_id = self.layer_id(Some(layer))?;
                let color_id = self.color_id(layer_id, color)?;
                let edit = ColorEdit::from_field(field, &value.join(" "))?;
                self.bench.update_color(layer_id, color_id, edit)?;
            }
            _ => bail!("usage: color add <layer> <pct> <name> | color rm <layer> <color> | color set <layer> <color> <field> <value>"),
        }
        Ok(())
    }

    fn layer_id(&self, raw: Option<&&str>) -> Result<Uuid> {
        let raw = raw.ok_or_else(|| anyhow!("missing layer number"))?;
        let position = position(raw)?;
        self.bench
            .layers()
            .id_at(position - 1)
            .ok_or_else(|| anyhow!("no layer {} (have {})", position, self.bench.layers().len()))
    }

    fn color_id(&self, layer_id: Uuid, raw: &str) -> Result<Uuid> {
        let position = position(raw)?;
        let spec = self
            .bench
            .layers()
            .get(layer_id)
            .and_then(|layer| layer.resin_spec())
            .ok_or_else(|| anyhow!("only resin layers have colors"))?;
        spec.colors
            .get(position - 1)
            .map(|color| color.id)
            .ok_or_else(|| anyhow!("no color {} on this layer", position))
    }
}

fn single<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    match args {
        [value] => Ok(*value),
        _ => Err(anyhow!("usage: {}", usage)),
    }
}

fn position(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(anyhow!("expected a position starting at 1, got '{}'", raw)),
    }
}
