//! Export of laid-out diagrams.
//!
//! This is the last stage of the rendering pipeline:
//!
//! ```text
//! Diagram (semantic model)
//!     ↓ structure
//! DiagramHierarchy
//!     ↓ layout
//! DiagramLayout
//!     ↓ export (this module)
//! SVG text → PNG bytes
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: draws a [`DiagramLayout`](crate::layout::DiagramLayout) with the
//!   core drawables
//! - [`png`]: rasterizes SVG text with `resvg`
//! - `dot` (feature `graphviz`): hands the semantic model to Graphviz and
//!   skips the in-process layout altogether
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`CaffeineError::Export`](crate::CaffeineError::Export) at the crate
//! boundary.

#[cfg(feature = "graphviz")]
pub mod dot;
pub mod png;
pub mod svg;

use thiserror::Error;

/// Failures between a laid-out diagram and encoded image bytes.
#[derive(Debug, Error)]
pub enum Error {
    /// The SVG document could not be produced or parsed.
    #[error("cannot render diagram: {0}")]
    Render(String),

    #[error("cannot rasterize diagram: {0}")]
    Rasterize(String),

    /// `dot` is missing or rejected the generated graph.
    #[cfg(feature = "graphviz")]
    #[error("graphviz failed: {0}")]
    Graphviz(String),
}
