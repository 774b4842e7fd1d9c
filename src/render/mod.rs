/// Rendering layer: every figure is drawn off-screen and saved as PNG.
///
/// ```text
///   ChiralityTable ──► chart::prepare_chart ──► chart::render_grouped_bars ─┐
///                                                                           ├─► raster (PNG)
///   FITS map ──► loader ──► filter::strip_sentinels ──► map::render_scatter_map ─┘
/// ```

pub mod chart;
pub mod map;
pub mod raster;
