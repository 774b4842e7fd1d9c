use std::path::Path;

use anyhow::Result;

use crate::config::Settings;
use crate::data::filter::distinct_molecules;
use crate::data::model::ChiralityTable;
use crate::render::chart::{plot_chirality_grouped, ChartOutcome};
use crate::render::map::{plot_spectral_map, MapOutcome};

// ---------------------------------------------------------------------------
// Chirality answer key
// ---------------------------------------------------------------------------

/// Print the table, then chart every distinct molecule once, in
/// first-occurrence order. Achiral molecules come back as `Skipped`.
pub fn run_chirality(table: &ChiralityTable, out_dir: &Path) -> Result<Vec<(String, ChartOutcome)>> {
    println!("\nCombined Bennu + Earth chirality table:\n");
    print!("{table}");

    log::info!("Generating chirality plots for each molecule...");
    distinct_molecules(table)
        .into_iter()
        .map(|molecule| -> Result<(String, ChartOutcome)> {
            let outcome = plot_chirality_grouped(table, molecule, out_dir)?;
            Ok((molecule.to_string(), outcome))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Spectral maps
// ---------------------------------------------------------------------------

/// Render every configured map product. A missing file only affects its own
/// target.
pub fn run_spectra(settings: &Settings) -> Result<Vec<MapOutcome>> {
    let targets = settings.resolved_targets()?;
    log::info!("Starting cleaned table analysis of {} map(s)", targets.len());

    let mut outcomes = Vec::with_capacity(targets.len());
    for (target, cmap) in targets {
        outcomes.push(plot_spectral_map(
            &settings.data_dir,
            &target.file,
            &target.title,
            cmap,
            &settings.out_dir,
        )?);
    }
    log::info!("Analysis complete.");
    Ok(outcomes)
}
