use super::model::{ChiralityRecord, ChiralityTable, Environment, Handedness, SpectralTable};

// ---------------------------------------------------------------------------
// Chirality selection and reshape
// ---------------------------------------------------------------------------

/// Distinct molecule names in first-occurrence order.
pub fn distinct_molecules(table: &ChiralityTable) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for r in table.records() {
        if !seen.contains(&r.molecule.as_str()) {
            seen.push(&r.molecule);
        }
    }
    seen
}

/// Records for `molecule` that carry a full L/D pair.
///
/// Empty for achiral molecules and for molecules absent from the table.
pub fn select_chiral<'a>(table: &'a ChiralityTable, molecule: &str) -> Vec<&'a ChiralityRecord> {
    table
        .records()
        .iter()
        .filter(|r| r.molecule == molecule && r.chirality.is_chiral())
        .collect()
}

/// One cell of the long-form table: (environment, handedness) → fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandednessFraction {
    pub environment: Environment,
    pub handedness: Handedness,
    pub fraction: f64,
}

/// Reshape one-row-per-environment records into one entry per
/// (environment, handedness). All L entries come first, then all D entries,
/// each in record order.
pub fn melt(records: &[&ChiralityRecord]) -> Vec<HandednessFraction> {
    let mut long = Vec::with_capacity(records.len() * 2);
    for hand in Handedness::ALL {
        for r in records {
            if let Some(fraction) = r.chirality.fraction(hand) {
                long.push(HandednessFraction {
                    environment: r.environment,
                    handedness: hand,
                    fraction,
                });
            }
        }
    }
    long
}

/// Distinct environments of a long-form table in first-encountered order.
pub fn environments(long: &[HandednessFraction]) -> Vec<Environment> {
    let mut envs = Vec::new();
    for cell in long {
        if !envs.contains(&cell.environment) {
            envs.push(cell.environment);
        }
    }
    envs
}

// ---------------------------------------------------------------------------
// Spectral sentinel masking
// ---------------------------------------------------------------------------

/// Fill value the OVIRS map products write for pixels without a measurement.
pub const NO_DATA_SENTINEL: f64 = -9999.0;

/// Anything at or below this is no-data. Real band depths sit above -100.
/// NaN never passes.
pub const NO_DATA_THRESHOLD: f64 = -9000.0;

pub fn is_valid_value(value: f64) -> bool {
    value > NO_DATA_THRESHOLD
}

/// Per-sample validity mask.
pub fn valid_mask(values: &[f64]) -> Vec<bool> {
    values.iter().map(|&v| is_valid_value(v)).collect()
}

/// Indices of samples that hold real data.
pub fn valid_indices(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, &v)| is_valid_value(v))
        .map(|(i, _)| i)
        .collect()
}

/// What the sentinel filter kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelSummary {
    pub original: usize,
    pub valid: usize,
    /// `(min, max)` of the retained values; `None` when nothing survived.
    pub range: Option<(f64, f64)>,
}

/// Drop no-data samples, returning the clean table and a summary.
pub fn strip_sentinels(table: &SpectralTable) -> (SpectralTable, SentinelSummary) {
    let keep = valid_indices(&table.value);
    let clean = table.select(&keep);
    let range = if clean.is_empty() {
        None
    } else {
        let min = clean.value.iter().copied().fold(f64::INFINITY, f64::min);
        let max = clean.value.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    };
    let summary = SentinelSummary {
        original: table.len(),
        valid: clean.len(),
        range,
    };
    (clean, summary)
}
