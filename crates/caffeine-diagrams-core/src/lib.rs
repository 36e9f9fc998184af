//! Caffeine Diagrams core types
//!
//! This crate holds the building blocks shared by the renderer:
//!
//! - **Colors**: CSS color parsing ([`color::Color`])
//! - **Geometry**: points, sizes, bounds and insets ([`geometry`] module)
//! - **Semantic**: the diagram model and its declarative builder ([`semantic`] module)
//! - **Draw**: drawables that emit layered SVG ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod semantic;
