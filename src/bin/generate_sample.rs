use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bennu_lens::config::{default_targets, DEFAULT_DATA_DIR};
use bennu_lens::data::filter::NO_DATA_SENTINEL;
use bennu_lens::data::fits::{write_bintable, write_primary_header, ColumnData, TableColumn};

/// SplitMix64, seeded for reproducible output.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * f64::EPSILON / 2.0
    }

    /// Standard normal via the Marsaglia polar method.
    fn normal(&mut self) -> f64 {
        loop {
            let u = 2.0 * self.unit() - 1.0;
            let v = 2.0 * self.unit() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }
}

/// Elliptical band-depth bump of height `peak` centred on `centre`.
fn band_depth(lat: f64, lon: f64, centre: (f64, f64), widths: (f64, f64), peak: f64) -> f64 {
    let dy = (lat - centre.0) / widths.0;
    let dx = (lon - centre.1) / widths.1;
    peak * (-0.5 * (dx * dx + dy * dy)).exp()
}

/// Footprint of the Nightingale site, degrees.
const LAT_RANGE: (f64, f64) = (50.0, 62.0);
const LON_RANGE: (f64, f64) = (35.0, 60.0);
const GRID: (usize, usize) = (120, 240);
/// Share of pixels left without a measurement.
const NO_DATA_RATE: f64 = 0.15;

/// One map: a broad blob of band depth centred on the crater, plus noise,
/// with a random scattering of sentinel pixels.
fn generate_map(rng: &mut SplitMix64, peak: f64, noise: f64) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let (rows, cols) = GRID;
    let centre = (56.0, 43.0);
    let mut lat = Vec::with_capacity(rows * cols);
    let mut lon = Vec::with_capacity(rows * cols);
    let mut val = Vec::with_capacity(rows * cols);

    for r in 0..rows {
        for c in 0..cols {
            let la = LAT_RANGE.0 + (LAT_RANGE.1 - LAT_RANGE.0) * r as f64 / (rows - 1) as f64;
            let lo = LON_RANGE.0 + (LON_RANGE.1 - LON_RANGE.0) * c as f64 / (cols - 1) as f64;
            let value = if rng.unit() < NO_DATA_RATE {
                NO_DATA_SENTINEL
            } else {
                band_depth(la, lo, centre, (3.0, 6.0), peak) + noise * rng.normal()
            };
            lat.push(la as f32);
            lon.push(lo as f32);
            val.push(value as f32);
        }
    }
    (lat, lon, val)
}

fn write_map(path: &Path, lat: Vec<f32>, lon: Vec<f32>, val: Vec<f32>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_primary_header(&mut writer)?;
    let columns = [
        TableColumn {
            name: "LATITUDE".to_string(),
            data: ColumnData::F32(lat),
        },
        TableColumn {
            name: "LONGITUDE".to_string(),
            data: ColumnData::F32(lon),
        },
        TableColumn {
            name: "VALUE".to_string(),
            data: ColumnData::F32(val),
        },
    ];
    write_bintable(&mut writer, "MAP", &columns)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SplitMix64(42);
    let out_dir = Path::new(DEFAULT_DATA_DIR);
    std::fs::create_dir_all(out_dir).context("creating data directory")?;

    let peaks = [(0.08, 0.004), (0.15, 0.006)];
    for (target, (peak, noise)) in default_targets().iter().zip(peaks) {
        let (lat, lon, val) = generate_map(&mut rng, peak, noise);
        let n = val.len();
        let path = out_dir.join(&target.file);
        write_map(&path, lat, lon, val)?;
        println!("Wrote {n} pixels for {:?} to {}", target.title, path.display());
    }
    Ok(())
}
