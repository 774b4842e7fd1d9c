//! Bennu vs Earth sample chemistry explorer.
//!
//! Two independent pipelines:
//! * the chirality answer key: a small L/D enantiomer table for a handful of
//!   amino acids, charted molecule by molecule;
//! * OVIRS spectral maps: FITS map products with no-data sentinels stripped,
//!   rendered as colour-coded scatter maps.

pub mod color;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod render;

pub use color::ColorMap;
pub use config::{Settings, SpectralTarget};
pub use data::fixture::{build_table, ChiralityFixture};
pub use data::model::{ChiralityRecord, ChiralityTable, Chirality, Environment};
