/// Renderer-independent figure layout
pub mod figure;
/// PNG rendering of figure geometry
pub mod raster;
/// SVG rendering with titles and statistics text
pub mod svg;
