//! Drawable components for diagram rendering
//!
//! Every visual element implements [`Drawable`]: it knows its own size and
//! renders itself, centered on a position, into a [`LayeredOutput`].

mod arrow;
mod cluster;
mod icon;
mod layer;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDrawer, Curve};
pub use cluster::{ClusterBox, ClusterDefinition, TITLE_INSET};
pub use icon::{IconNode, glyph};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Text, TextDefinition};

use crate::geometry::{Point, Size};

pub trait Drawable: std::fmt::Debug {
    /// Renders the element centered on `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    fn size(&self) -> Size;
}
