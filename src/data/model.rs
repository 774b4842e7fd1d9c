use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Environment – where a sample was measured
// ---------------------------------------------------------------------------

/// Source environment of a chirality observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Environment {
    /// Meteoritic material returned from asteroid Bennu.
    Bennu,
    /// Terrestrial biological control.
    Earth,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Bennu => write!(f, "Bennu"),
            Environment::Earth => write!(f, "Earth"),
        }
    }
}

// ---------------------------------------------------------------------------
// Handedness / Chirality
// ---------------------------------------------------------------------------

/// One of the two enantiomer forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    L,
    D,
}

impl Handedness {
    /// Plot order: L first, then D.
    pub const ALL: [Handedness; 2] = [Handedness::L, Handedness::D];

    /// Legend label, exactly "L" or "D".
    pub fn label(self) -> &'static str {
        match self {
            Handedness::L => "L",
            Handedness::D => "D",
        }
    }
}

/// L/D enantiomer split of a molecule.
///
/// Achiral molecules (glycine) have no mirror-image forms, so they carry no
/// fractions at all instead of a pair of missing values. The pair is kept
/// exactly as measured: near-racemic noise means `l + d` need not be 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chirality {
    Chiral { l: f64, d: f64 },
    Achiral,
}

impl Chirality {
    /// Both fractions, or `None` for an achiral molecule.
    pub fn fractions(&self) -> Option<(f64, f64)> {
        match *self {
            Chirality::Chiral { l, d } => Some((l, d)),
            Chirality::Achiral => None,
        }
    }

    pub fn l_fraction(&self) -> Option<f64> {
        self.fractions().map(|(l, _)| l)
    }

    pub fn d_fraction(&self) -> Option<f64> {
        self.fractions().map(|(_, d)| d)
    }

    /// Fraction for the given handedness.
    pub fn fraction(&self, hand: Handedness) -> Option<f64> {
        match hand {
            Handedness::L => self.l_fraction(),
            Handedness::D => self.d_fraction(),
        }
    }

    pub fn is_chiral(&self) -> bool {
        matches!(self, Chirality::Chiral { .. })
    }
}

// ---------------------------------------------------------------------------
// ChiralityRecord – one row per molecule × environment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChiralityRecord {
    pub molecule: String,
    pub environment: Environment,
    pub chirality: Chirality,
    /// Total abundance in parts per billion. Only measured for meteoritic
    /// samples; the Earth control leaves it unset (not zero).
    pub total_abundance_ppb: Option<f64>,
    pub notes: String,
}

// ---------------------------------------------------------------------------
// ChiralityTable – ordered, immutable collection of records
// ---------------------------------------------------------------------------

/// Ordered record collection. Order only matters for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChiralityTable {
    records: Vec<ChiralityRecord>,
}

impl ChiralityTable {
    pub fn new(records: Vec<ChiralityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ChiralityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching both molecule and environment.
    pub fn find<'a>(
        &'a self,
        molecule: &'a str,
        environment: Environment,
    ) -> impl Iterator<Item = &'a ChiralityRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.molecule == molecule && r.environment == environment)
    }
}

const COLUMNS: [&str; 6] = [
    "molecule",
    "environment",
    "L_fraction",
    "D_fraction",
    "total_abundance_ppb",
    "notes",
];

// `{:?}` gives the shortest form that reads back to the same f64 and keeps
// the decimal point on whole numbers.
fn fmt_fraction(v: Option<f64>) -> String {
    v.map(|v| format!("{v:?}")).unwrap_or_else(|| "NaN".to_string())
}

fn fmt_abundance(v: Option<f64>) -> String {
    v.map(|v| format!("{v:?}")).unwrap_or_else(|| "<NA>".to_string())
}

/// Unindexed text dump: one header line, then one aligned line per record.
/// Text columns are left-aligned, numeric columns right-aligned.
impl fmt::Display for ChiralityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 6]> = self
            .records
            .iter()
            .map(|r| {
                [
                    r.molecule.clone(),
                    r.environment.to_string(),
                    fmt_fraction(r.chirality.l_fraction()),
                    fmt_fraction(r.chirality.d_fraction()),
                    fmt_abundance(r.total_abundance_ppb),
                    r.notes.clone(),
                ]
            })
            .collect();

        let mut widths = COLUMNS.map(|c| c.chars().count());
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: [&str; 6]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let pad = widths[i].saturating_sub(cell.chars().count());
                    if (2..=4).contains(&i) {
                        format!("{}{cell}", " ".repeat(pad))
                    } else {
                        format!("{cell}{}", " ".repeat(pad))
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", line(COLUMNS))?;
        for row in &rows {
            let cells = [
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str(),
                row[4].as_str(),
                row[5].as_str(),
            ];
            writeln!(f, "{}", line(cells))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Spectral map samples
// ---------------------------------------------------------------------------

/// One detector pixel of a spectral map product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSample {
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

/// Column-oriented spectral table; the three columns always share a length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectralTable {
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub value: Vec<f64>,
}

impl SpectralTable {
    /// Returns `None` if the columns differ in length.
    pub fn from_columns(latitude: Vec<f64>, longitude: Vec<f64>, value: Vec<f64>) -> Option<Self> {
        if latitude.len() != value.len() || longitude.len() != value.len() {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
            value,
        })
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn sample(&self, idx: usize) -> SpectralSample {
        SpectralSample {
            latitude: self.latitude[idx],
            longitude: self.longitude[idx],
            value: self.value[idx],
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = SpectralSample> + '_ {
        (0..self.len()).map(move |i| self.sample(i))
    }

    /// Subset keeping only the given row indices, in order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            latitude: indices.iter().map(|&i| self.latitude[i]).collect(),
            longitude: indices.iter().map(|&i| self.longitude[i]).collect(),
            value: indices.iter().map(|&i| self.value[i]).collect(),
        }
    }
}
