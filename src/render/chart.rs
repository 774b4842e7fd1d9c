use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;

use super::raster::Raster;
use crate::color::generate_palette;
use crate::data::filter::{environments, melt, select_chiral, HandednessFraction};
use crate::data::model::{ChiralityTable, Environment, Handedness};

// ---------------------------------------------------------------------------
// Layout (pure)
// ---------------------------------------------------------------------------

/// Width of a single bar, in category units.
pub const BAR_WIDTH: f64 = 0.35;
/// Upper y limit: the fraction range plus a small margin.
pub const Y_MAX: f64 = 1.05;

const CHART_WIDTH: u32 = 900;
const CHART_HEIGHT: u32 = 600;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub environment: Environment,
    pub handedness: Handedness,
    /// Bar centre on the x axis.
    pub center: f64,
    pub height: f64,
}

impl Bar {
    pub fn left(&self) -> f64 {
        self.center - BAR_WIDTH / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center + BAR_WIDTH / 2.0
    }
}

/// Bars for one molecule: environment `i` is centred at `x = i`, with the L
/// bar shifted left and the D bar shifted right by half a bar width.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarLayout {
    pub molecule: String,
    pub environments: Vec<Environment>,
    pub bars: Vec<Bar>,
}

impl GroupedBarLayout {
    pub fn bars_for(&self, env: Environment) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(move |b| b.environment == env)
    }
}

pub fn layout_grouped_bars(molecule: &str, long: &[HandednessFraction]) -> GroupedBarLayout {
    let envs = environments(long);
    let mut bars = Vec::with_capacity(envs.len() * 2);
    for (i, hand) in Handedness::ALL.into_iter().enumerate() {
        let offset = (i as f64 - 0.5) * BAR_WIDTH;
        for (x, &env) in envs.iter().enumerate() {
            // First matching cell wins when an environment appears twice.
            let cell = long
                .iter()
                .find(|c| c.environment == env && c.handedness == hand);
            if let Some(cell) = cell {
                bars.push(Bar {
                    environment: env,
                    handedness: hand,
                    center: x as f64 + offset,
                    height: cell.fraction,
                });
            }
        }
    }
    GroupedBarLayout {
        molecule: molecule.to_string(),
        environments: envs,
        bars,
    }
}

/// Select, reshape and lay out one molecule. `None` when it has nothing to
/// plot (achiral, or not in the table).
pub fn prepare_chart(table: &ChiralityTable, molecule: &str) -> Option<GroupedBarLayout> {
    let selected = select_chiral(table, molecule);
    if selected.is_empty() {
        return None;
    }
    Some(layout_grouped_bars(molecule, &melt(&selected)))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ChartOutcome {
    Rendered { path: PathBuf, layout: GroupedBarLayout },
    Skipped,
}

/// `chirality_<molecule>.png`, with anything but letters and digits mapped to
/// `_`. Case is kept so names differing only in case get separate files.
pub fn chart_filename(molecule: &str) -> String {
    let slug: String = molecule
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("chirality_{slug}.png")
}

/// Grouped L/D bar chart for one molecule across environments, written to
/// `out_dir`. Molecules without chirality data are skipped with a notice.
pub fn plot_chirality_grouped(
    table: &ChiralityTable,
    molecule: &str,
    out_dir: &Path,
) -> Result<ChartOutcome> {
    let Some(layout) = prepare_chart(table, molecule) else {
        log::warn!("[skip] {molecule}: no chirality data to plot.");
        return Ok(ChartOutcome::Skipped);
    };

    let path = out_dir.join(chart_filename(molecule));
    render_grouped_bars(&layout, &path)?;
    log::info!("Saved chirality chart to {}", path.display());
    Ok(ChartOutcome::Rendered { path, layout })
}

pub fn render_grouped_bars(layout: &GroupedBarLayout, path: &Path) -> Result<()> {
    let n = layout.environments.len();
    let colors = generate_palette(Handedness::ALL.len());
    let envs = &layout.environments;
    let tick_label = |x: &f64| -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        envs.get(idx as usize).map(|e| e.to_string()).unwrap_or_default()
    };

    let mut raster = Raster::new(CHART_WIDTH, CHART_HEIGHT);
    raster.draw(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Chirality comparison: {}", layout.molecule),
                ("sans-serif", 26),
            )
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(56)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0f64..Y_MAX)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&tick_label)
            .y_desc("Fraction")
            .draw()?;

        for (hand, color) in Handedness::ALL.into_iter().zip(colors) {
            chart
                .draw_series(
                    layout
                        .bars
                        .iter()
                        .filter(|b| b.handedness == hand)
                        .map(|b| Rectangle::new([(b.left(), 0.0), (b.right(), b.height)], color.filled())),
                )?
                .label(hand.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    })?;
    raster.save_png(path)
}
