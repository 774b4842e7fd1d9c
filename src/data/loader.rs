use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use thiserror::Error;

use super::fits::FitsFile;
use super::model::{ChiralityRecord, ChiralityTable, Chirality, Environment, SpectralTable};

// ---------------------------------------------------------------------------
// Chirality tables
// ---------------------------------------------------------------------------

/// Rejected rows of a loaded chirality table. Row numbers are zero-based.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("row {row} ({molecule}): L and D fractions must be both present or both absent")]
    UnpairedFractions { row: usize, molecule: String },

    #[error("row {row} ({molecule}): fraction {value} is outside [0, 1]")]
    FractionOutOfRange { row: usize, molecule: String, value: f64 },

    #[error("row {row} ({molecule}): abundance {value} must be a non-negative number")]
    InvalidAbundance { row: usize, molecule: String, value: f64 },
}

/// Row layout shared by the JSON and CSV sources. Column names follow the
/// table dump, so `L_fraction` / `D_fraction` are accepted as well.
#[derive(Debug, Deserialize)]
struct RawRecord {
    molecule: String,
    environment: Environment,
    #[serde(alias = "L_fraction")]
    l_fraction: Option<f64>,
    #[serde(alias = "D_fraction")]
    d_fraction: Option<f64>,
    total_abundance_ppb: Option<f64>,
    #[serde(default)]
    notes: String,
}

impl RawRecord {
    fn into_record(self, row: usize) -> std::result::Result<ChiralityRecord, TableError> {
        let chirality = match (self.l_fraction, self.d_fraction) {
            (Some(l), Some(d)) => {
                for value in [l, d] {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(TableError::FractionOutOfRange {
                            row,
                            molecule: self.molecule,
                            value,
                        });
                    }
                }
                Chirality::Chiral { l, d }
            }
            (None, None) => Chirality::Achiral,
            _ => {
                return Err(TableError::UnpairedFractions {
                    row,
                    molecule: self.molecule,
                })
            }
        };

        if let Some(value) = self.total_abundance_ppb {
            if !value.is_finite() || value < 0.0 {
                return Err(TableError::InvalidAbundance {
                    row,
                    molecule: self.molecule,
                    value,
                });
            }
        }

        Ok(ChiralityRecord {
            molecule: self.molecule,
            environment: self.environment,
            chirality,
            total_abundance_ppb: self.total_abundance_ppb,
            notes: self.notes,
        })
    }
}

fn validate(raw: Vec<RawRecord>) -> Result<ChiralityTable> {
    let records = raw
        .into_iter()
        .enumerate()
        .map(|(row, r)| r.into_record(row))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ChiralityTable::new(records))
}

/// Load a chirality table in place of the built-in fixture. Dispatch by
/// extension.
///
/// Supported formats:
/// * `.json` – `[{ "molecule": ..., "environment": "Bennu", "l_fraction": 0.49, ... }, ...]`
/// * `.csv`  – header row with the same column names; empty cells are absent
pub fn load_chirality_table(path: &Path) -> Result<ChiralityTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    validate(raw).with_context(|| format!("validating {}", path.display()))
}

fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON")
}

fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    reader
        .deserialize()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Spectral map products
// ---------------------------------------------------------------------------

pub const LATITUDE_COLUMN: &str = "LATITUDE";
pub const LONGITUDE_COLUMN: &str = "LONGITUDE";
pub const VALUE_COLUMN: &str = "VALUE";

/// HDU holding the map table; HDU 0 is an empty primary.
const DATA_HDU: usize = 1;

/// Read the latitude/longitude/value columns of a map product.
///
/// Returns `Ok(None)` when the file has no data extension. A data extension
/// without the expected columns is an error.
pub fn load_spectral_table(path: &Path) -> Result<Option<SpectralTable>> {
    let fits = FitsFile::open(path).with_context(|| format!("reading {}", path.display()))?;
    let Some(table) = fits.binary_table(DATA_HDU)? else {
        return Ok(None);
    };

    let latitude = table.read_f64(LATITUDE_COLUMN)?;
    let longitude = table.read_f64(LONGITUDE_COLUMN)?;
    let value = table.read_f64(VALUE_COLUMN)?;

    let spectral = SpectralTable::from_columns(latitude, longitude, value)
        .context("map columns differ in length")?;
    Ok(Some(spectral))
}
