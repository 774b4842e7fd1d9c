use std::str::FromStr;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Discrete palette (bar series)
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.50);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            RGBColor(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous colour maps (scatter maps)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
#[error("unknown colour map {0:?} (expected one of viridis, plasma, magma, inferno, cividis, gray)")]
pub struct UnknownColorMap(pub String);

/// Named perceptual colour map, sampled at five evenly spaced stops and
/// interpolated in linear RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    Viridis,
    Plasma,
    Magma,
    Inferno,
    Cividis,
    Gray,
}

impl ColorMap {
    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Viridis => "viridis",
            ColorMap::Plasma => "plasma",
            ColorMap::Magma => "magma",
            ColorMap::Inferno => "inferno",
            ColorMap::Cividis => "cividis",
            ColorMap::Gray => "gray",
        }
    }

    fn stops(self) -> [u32; 5] {
        match self {
            ColorMap::Viridis => [0x440154, 0x3b528b, 0x21918c, 0x5ec962, 0xfde725],
            ColorMap::Plasma => [0x0d0887, 0x7e03a8, 0xcc4778, 0xf89540, 0xf0f921],
            ColorMap::Magma => [0x000004, 0x51127c, 0xb73779, 0xfc8961, 0xfcfdbf],
            ColorMap::Inferno => [0x000004, 0x56106e, 0xbb3754, 0xf98e09, 0xfcffa4],
            ColorMap::Cividis => [0x00224e, 0x414d6b, 0x7c7b78, 0xbcaf6f, 0xfee838],
            ColorMap::Gray => [0x000000, 0x404040, 0x808080, 0xbfbfbf, 0xffffff],
        }
    }

    /// Colour at position `t` in [0, 1]; out-of-range and NaN inputs clamp.
    pub fn color_at(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = t as f32;
        let scaled = t * (stops.len() - 1) as f32;
        let lo = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lo as f32;

        let a = hex_to_linear(stops[lo]);
        let b = hex_to_linear(stops[lo + 1]);
        let mixed: Srgb = Srgb::from_linear(a.mix(b, frac));
        let rgb: Srgb<u8> = mixed.into_format();
        RGBColor(rgb.red, rgb.green, rgb.blue)
    }

    /// Colour for `value` normalised over `[min, max]`. A flat range maps to
    /// the middle of the scale.
    pub fn color_for(self, value: f64, min: f64, max: f64) -> RGBColor {
        let span = max - min;
        if span.abs() < f64::EPSILON {
            return self.color_at(0.5);
        }
        self.color_at((value - min) / span)
    }
}

fn hex_to_linear(hex: u32) -> LinSrgb {
    let rgb = Srgb::new(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    );
    rgb.into_format::<f32>().into_linear()
}

impl FromStr for ColorMap {
    type Err = UnknownColorMap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viridis" => Ok(ColorMap::Viridis),
            "plasma" => Ok(ColorMap::Plasma),
            "magma" => Ok(ColorMap::Magma),
            "inferno" => Ok(ColorMap::Inferno),
            "cividis" => Ok(ColorMap::Cividis),
            "gray" | "grey" => Ok(ColorMap::Gray),
            _ => Err(UnknownColorMap(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(2);
        assert_eq!(p.len(), 2);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn test_endpoints_match_stops() {
        assert_eq!(ColorMap::Viridis.color_at(0.0), RGBColor(0x44, 0x01, 0x54));
        assert_eq!(ColorMap::Viridis.color_at(1.0), RGBColor(0xfd, 0xe7, 0x25));
        assert_eq!(ColorMap::Gray.color_at(0.5), RGBColor(0x80, 0x80, 0x80));
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(ColorMap::Plasma.color_at(-3.0), ColorMap::Plasma.color_at(0.0));
        assert_eq!(ColorMap::Plasma.color_at(7.0), ColorMap::Plasma.color_at(1.0));
        assert_eq!(ColorMap::Plasma.color_at(f64::NAN), ColorMap::Plasma.color_at(0.0));
    }

    #[test]
    fn test_flat_range_uses_midpoint() {
        assert_eq!(ColorMap::Magma.color_for(3.0, 3.0, 3.0), ColorMap::Magma.color_at(0.5));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Plasma".parse::<ColorMap>(), Ok(ColorMap::Plasma));
        assert_eq!("viridis".parse::<ColorMap>().unwrap().name(), "viridis");
        assert!("jet".parse::<ColorMap>().is_err());
    }
}
