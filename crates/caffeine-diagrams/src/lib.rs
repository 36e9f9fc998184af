//! Caffeine Diagrams - architecture diagrams of the Caffeine project.
//!
//! Diagrams are declared in code with the [`semantic`] model, laid out in
//! layers by [`layout`], drawn to SVG and rasterized to PNG. The four
//! Caffeine diagrams themselves live in [`catalog`].
//!
//! ```text
//! Diagram ─▶ DiagramHierarchy ─▶ DiagramLayout ─▶ SVG ─▶ PNG
//! ```
//!
//! With the `graphviz` feature and `layout.engine = "graphviz"`, the whole
//! pipeline is handed to the Graphviz `dot` executable instead.

pub mod catalog;
pub mod config;
pub mod layout;
pub mod structure;
pub mod theme;

mod error;
mod export;

pub use caffeine_diagrams_core::{color, draw, geometry, semantic};

pub use error::CaffeineError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use config::{AppConfig, OutputFormat};
use layout::{DiagramLayout, LayoutBuilder};
use semantic::Diagram;
use structure::DiagramHierarchy;
use theme::Theme;

/// Renders diagrams according to an [`AppConfig`].
///
/// # Examples
///
/// ```rust,no_run
/// use caffeine_diagrams::{DiagramRenderer, catalog, config::{AppConfig, OutputFormat}};
///
/// let renderer = DiagramRenderer::new(AppConfig::default());
/// for entry in catalog::caffeine_diagrams() {
///     let path = renderer
///         .write(entry.diagram(), "/tmp/diagrams".as_ref(), OutputFormat::Png)
///         .expect("Failed to render");
///     println!("{}", path.display());
/// }
/// ```
#[derive(Debug, Default)]
pub struct DiagramRenderer {
    config: AppConfig,
}

impl DiagramRenderer {
    /// Create a renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compute the layout of `diagram` with the configured engine and spacing.
    ///
    /// # Errors
    ///
    /// Returns [`CaffeineError::InvalidDiagram`] if the diagram fails
    /// validation, [`CaffeineError::Config`] for unparsable style colors, and
    /// [`CaffeineError::Layout`] if the layout cannot be resolved.
    pub fn layout(&self, diagram: &Diagram) -> Result<DiagramLayout, CaffeineError> {
        let theme = Theme::from_style(self.config.style())?;
        self.layout_with_theme(diagram, &theme)
    }

    /// Render `diagram` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`layout`](Self::layout), plus
    /// [`CaffeineError::Export`] if drawing fails.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, CaffeineError> {
        #[cfg(feature = "graphviz")]
        if self.uses_graphviz() {
            diagram.validate()?;
            let bytes = export::dot::render(diagram, self.config.style(), OutputFormat::Svg)?;
            return String::from_utf8(bytes).map_err(|err| CaffeineError::Export(Box::new(err)));
        }

        let theme = Theme::from_style(self.config.style())?;
        let layout = self.layout_with_theme(diagram, &theme)?;
        let svg = export::svg::render_svg(diagram, &layout, &theme)?;
        debug!(bytes = svg.len(); "SVG rendered");
        Ok(svg)
    }

    /// Render `diagram` to PNG bytes at the configured scale.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`render_svg`](Self::render_svg), plus
    /// [`CaffeineError::Export`] if rasterization fails or the scale is not
    /// a positive number.
    pub fn render_png(&self, diagram: &Diagram) -> Result<Vec<u8>, CaffeineError> {
        #[cfg(feature = "graphviz")]
        if self.uses_graphviz() {
            diagram.validate()?;
            return Ok(export::dot::render(
                diagram,
                self.config.style(),
                OutputFormat::Png,
            )?);
        }

        let svg = self.render_svg(diagram)?;
        let png = export::png::rasterize(&svg, self.config.output().scale())?;
        Ok(png)
    }

    /// Render `diagram` into the bytes of `format`.
    ///
    /// # Errors
    ///
    /// See [`render_svg`](Self::render_svg) and [`render_png`](Self::render_png).
    pub fn render(&self, diagram: &Diagram, format: OutputFormat) -> Result<Vec<u8>, CaffeineError> {
        match format {
            OutputFormat::Png => self.render_png(diagram),
            OutputFormat::Svg => self.render_svg(diagram).map(String::into_bytes),
        }
    }

    /// Render `diagram` and write it to `<dir>/<filename>.<extension>`.
    ///
    /// `dir` must exist. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns the rendering errors of [`render`](Self::render), or
    /// [`CaffeineError::Write`] if the file cannot be written.
    pub fn write(
        &self,
        diagram: &Diagram,
        dir: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf, CaffeineError> {
        let bytes = self.render(diagram, format)?;
        let path = dir.join(format!("{}.{}", diagram.filename(), format.extension()));
        fs::write(&path, &bytes).map_err(|err| CaffeineError::write(&path, err))?;
        info!(path:? = path, bytes = bytes.len(); "Diagram written");
        Ok(path)
    }

    fn layout_with_theme(
        &self,
        diagram: &Diagram,
        theme: &Theme,
    ) -> Result<DiagramLayout, CaffeineError> {
        info!(title = diagram.title(); "Building diagram structure");
        let hierarchy = DiagramHierarchy::from_diagram(diagram)?;

        let layout_config = self.config.layout();
        LayoutBuilder::new(theme)
            .with_engine(layout_config.engine())
            .with_node_spacing(layout_config.node_spacing())
            .with_rank_spacing(layout_config.rank_spacing())
            .build(&hierarchy)
    }

    #[cfg(feature = "graphviz")]
    fn uses_graphviz(&self) -> bool {
        self.config.layout().engine() == semantic::LayoutEngine::Graphviz
    }
}
