// CV layout: word-wraps optimized CV text and places it on A4 pages, ready for
// a PDF writer on the client side.

pub mod font_metrics;
pub mod handlers;
pub mod paginate;

// Re-export the public API consumed by other modules (state, handlers).
pub use font_metrics::{default_page_config, FontFamily, PageConfig};
pub use paginate::{layout_cv, CvLayout};
