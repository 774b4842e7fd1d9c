/// Data layer: core types, fixtures, loading, and filtering.
///
/// Architecture:
/// ```text
///  fixture / .json / .csv          .fits
///        │                           │
///        ▼                           ▼
///   ┌──────────────┐          ┌──────────┐
///   │ChiralityTable│          │  loader   │  fits → SpectralTable
///   └──────────────┘          └──────────┘
///        │                           │
///        ▼                           ▼
///   ┌──────────┐              ┌──────────┐
///   │  filter   │ select+melt  │  filter   │  drop no-data sentinels
///   └──────────┘              └──────────┘
/// ```

pub mod filter;
pub mod fits;
pub mod fixture;
pub mod loader;
pub mod model;
