use super::model::{ChiralityRecord, ChiralityTable, Chirality, Environment};

// ---------------------------------------------------------------------------
// Fixture rows
// ---------------------------------------------------------------------------

/// One molecule entry inside an environment block.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRow {
    pub molecule: String,
    pub chirality: Chirality,
    pub total_abundance_ppb: Option<f64>,
    pub notes: String,
}

impl FixtureRow {
    fn chiral(molecule: &str, l: f64, d: f64, abundance: Option<f64>, notes: &str) -> Self {
        Self {
            molecule: molecule.to_string(),
            chirality: Chirality::Chiral { l, d },
            total_abundance_ppb: abundance,
            notes: notes.to_string(),
        }
    }

    fn achiral(molecule: &str, abundance: Option<f64>, notes: &str) -> Self {
        Self {
            molecule: molecule.to_string(),
            chirality: Chirality::Achiral,
            total_abundance_ppb: abundance,
            notes: notes.to_string(),
        }
    }
}

/// All rows measured in one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentBlock {
    pub environment: Environment,
    pub rows: Vec<FixtureRow>,
}

// ---------------------------------------------------------------------------
// ChiralityFixture – injectable dataset
// ---------------------------------------------------------------------------

/// Dataset the table builder assembles, one block per environment.
///
/// `Default` is the placeholder Bennu/Earth answer key. Real archive data
/// goes in through [`ChiralityFixture::new`] or the table loaders.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiralityFixture {
    pub blocks: Vec<EnvironmentBlock>,
}

impl ChiralityFixture {
    pub fn new(blocks: Vec<EnvironmentBlock>) -> Self {
        Self { blocks }
    }

    /// Placeholder meteoritic measurements.
    pub fn bennu_placeholder() -> EnvironmentBlock {
        EnvironmentBlock {
            environment: Environment::Bennu,
            rows: vec![
                FixtureRow::chiral("Alanine", 0.49, 0.51, Some(35.0), "near-racemic; chiral"),
                FixtureRow::chiral("β-Alanine", 0.52, 0.48, Some(15.0), "near-racemic; chiral"),
                FixtureRow::chiral(
                    "Isovaline",
                    0.50,
                    0.50,
                    Some(8.0),
                    "classic meteoritic amino acid; chiral",
                ),
                FixtureRow::achiral("Glycine", Some(120.0), "achiral; abundance-only in this toy table"),
            ],
        }
    }

    /// Biological control. Abundance is not measured for the control.
    pub fn earth_placeholder() -> EnvironmentBlock {
        EnvironmentBlock {
            environment: Environment::Earth,
            rows: vec![
                FixtureRow::chiral("Alanine", 1.00, 0.00, None, "proteinogenic; homochiral L in biology"),
                FixtureRow::chiral("β-Alanine", 1.00, 0.00, None, "treated as 'all L' control here"),
                FixtureRow::chiral("Isovaline", 1.00, 0.00, None, "hypothetical Earth-life use case; all L"),
                FixtureRow::achiral("Glycine", None, "achiral; abundance-only control"),
            ],
        }
    }
}

impl Default for ChiralityFixture {
    fn default() -> Self {
        Self::new(vec![Self::bennu_placeholder(), Self::earth_placeholder()])
    }
}

// ---------------------------------------------------------------------------
// Table builder
// ---------------------------------------------------------------------------

/// Flatten the fixture into an ordered table: blocks in fixture order,
/// rows within a block in declaration order.
pub fn build_table(fixture: &ChiralityFixture) -> ChiralityTable {
    let records = fixture
        .blocks
        .iter()
        .flat_map(|block| {
            block.rows.iter().map(move |row| ChiralityRecord {
                molecule: row.molecule.clone(),
                environment: block.environment,
                chirality: row.chirality,
                total_abundance_ppb: row.total_abundance_ppb,
                notes: row.notes.clone(),
            })
        })
        .collect();
    ChiralityTable::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> ChiralityTable {
        build_table(&ChiralityFixture::default())
    }

    #[test]
    fn test_covers_every_molecule_in_both_environments() {
        let table = default_table();
        assert_eq!(table.len(), 8);
        for molecule in ["Alanine", "β-Alanine", "Isovaline", "Glycine"] {
            for env in [Environment::Bennu, Environment::Earth] {
                assert_eq!(table.find(molecule, env).count(), 1, "{molecule} / {env}");
            }
        }
    }

    #[test]
    fn test_alanine_bennu_row() {
        let table = default_table();
        let rows: Vec<_> = table.find("Alanine", Environment::Bennu).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chirality.fractions(), Some((0.49, 0.51)));
        assert_eq!(rows[0].total_abundance_ppb, Some(35.0));
    }

    #[test]
    fn test_alanine_earth_row() {
        let table = default_table();
        let rows: Vec<_> = table.find("Alanine", Environment::Earth).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chirality.fractions(), Some((1.00, 0.00)));
        assert_eq!(rows[0].total_abundance_ppb, None);
    }

    #[test]
    fn test_glycine_is_achiral_everywhere() {
        let table = default_table();
        for env in [Environment::Bennu, Environment::Earth] {
            let row = table.find("Glycine", env).next().unwrap();
            assert_eq!(row.chirality, Chirality::Achiral);
        }
    }

    #[test]
    fn test_abundance_only_on_bennu_rows() {
        for r in default_table().records() {
            match r.environment {
                Environment::Bennu => assert!(r.total_abundance_ppb.is_some()),
                Environment::Earth => assert!(r.total_abundance_ppb.is_none()),
            }
        }
    }

    #[test]
    fn test_building_twice_is_bitwise_identical() {
        let a = default_table();
        let b = default_table();
        assert_eq!(a, b);
        let bits = |t: &ChiralityTable| -> Vec<(Option<u64>, Option<u64>, Option<u64>)> {
            t.records()
                .iter()
                .map(|r| {
                    (
                        r.chirality.l_fraction().map(f64::to_bits),
                        r.chirality.d_fraction().map(f64::to_bits),
                        r.total_abundance_ppb.map(f64::to_bits),
                    )
                })
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_injected_fixture_replaces_placeholder() {
        let fixture = ChiralityFixture::new(vec![EnvironmentBlock {
            environment: Environment::Earth,
            rows: vec![FixtureRow::chiral("Serine", 0.9, 0.1, None, "")],
        }]);
        let table = build_table(&fixture);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].molecule, "Serine");
    }
}
