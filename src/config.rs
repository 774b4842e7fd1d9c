use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{ColorMap, UnknownColorMap};

/// Where OVIRS map products live unless overridden.
pub const DEFAULT_DATA_DIR: &str = "data/pds";

fn default_cmap() -> String {
    "magma".to_string()
}

/// One spectral map product to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralTarget {
    /// File name relative to the data directory.
    pub file: String,
    pub title: String,
    #[serde(default = "default_cmap")]
    pub cmap: String,
}

impl SpectralTarget {
    pub fn new(file: &str, title: &str, cmap: &str) -> Self {
        Self {
            file: file.to_string(),
            title: title.to_string(),
            cmap: cmap.to_string(),
        }
    }

    pub fn color_map(&self) -> std::result::Result<ColorMap, UnknownColorMap> {
        self.cmap.parse()
    }
}

/// The two Nightingale-site OVIRS products: organics and hydration.
pub fn default_targets() -> Vec<SpectralTarget> {
    vec![
        SpectralTarget::new(
            "l_1600mm_sp_ovirs_recb_bandarea3200to3600nm_nightingale_wavc_0000n00000.fits",
            "Organic Carbon (3.4 micron)",
            "plasma",
        ),
        SpectralTarget::new(
            "l_1600mm_sp_ovirs_recb_oh2740nm_nightingale_wavc_0000n00000.fits",
            "Hydration (2.7 micron)",
            "viridis",
        ),
    ]
}

/// Read a target list: `[{"file": ..., "title": ..., "cmap": ...}, ...]`.
pub fn load_targets(path: &Path) -> Result<Vec<SpectralTarget>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading targets file {}", path.display()))?;
    serde_json::from_str(&text).context("parsing targets JSON")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub targets: Vec<SpectralTarget>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            out_dir: PathBuf::from("."),
            targets: default_targets(),
        }
    }
}

impl Settings {
    /// Resolve every target's colour map up front so a typo fails before
    /// anything is rendered.
    pub fn resolved_targets(&self) -> std::result::Result<Vec<(&SpectralTarget, ColorMap)>, UnknownColorMap> {
        self.targets
            .iter()
            .map(|t| t.color_map().map(|cmap| (t, cmap)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.data_dir, PathBuf::from("data/pds"));
        let resolved = s.resolved_targets().unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].1, ColorMap::Plasma);
        assert_eq!(resolved[1].1, ColorMap::Viridis);
    }

    #[test]
    fn test_unknown_cmap_fails_resolution() {
        let s = Settings {
            targets: vec![SpectralTarget::new("a.fits", "A", "rainbow")],
            ..Settings::default()
        };
        assert_eq!(
            s.resolved_targets().unwrap_err(),
            UnknownColorMap("rainbow".to_string())
        );
    }

    #[test]
    fn test_load_targets_defaults_cmap() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"file": "x.fits", "title": "Serpentine (2.7 micron)"}}]"#).unwrap();
        let targets = load_targets(file.path()).unwrap();
        assert_eq!(targets, vec![SpectralTarget::new("x.fits", "Serpentine (2.7 micron)", "magma")]);
    }
}
