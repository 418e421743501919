// Print layout: page geometry, per-font glyph metrics and the page-count estimate
// shown alongside an exported document.

pub mod font_metrics;
pub mod pagination;

pub use font_metrics::{FontFamily, PageGeometry, Paper};
pub use pagination::estimate_pages;
