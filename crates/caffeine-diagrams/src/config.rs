//! Configuration types for diagram rendering.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a partial TOML file (or none at all) yields a complete configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout, style and output settings.
//! - [`LayoutConfig`] - Layout engine selection and spacing.
//! - [`StyleConfig`] - Fonts, icon size and colors.
//! - [`OutputConfig`] - Output directory, image formats and raster scale.
//!
//! # Example
//!
//! ```
//! # use caffeine_diagrams::config::{AppConfig, OutputFormat};
//! let config = AppConfig::default();
//! assert_eq!(config.output().formats(), &[OutputFormat::Png]);
//! assert!(config.style().background_color().unwrap().is_none());
//! ```

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use caffeine_diagrams_core::{color::Color, semantic::LayoutEngine};

/// Directory the viewer application serves diagrams from
pub const DEFAULT_OUTPUT_DIR: &str = "/root/caffeine/viz-flow/public/diagrams";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig, output: OutputConfig) -> Self {
        Self {
            layout,
            style,
            output,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Mutable access to the output section, for command-line overrides.
    pub fn output_mut(&mut self) -> &mut OutputConfig {
        &mut self.output
    }
}

/// Layout engine and spacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// [`LayoutEngine`] used for every diagram
    engine: LayoutEngine,

    /// Gap between neighbouring items of one rank
    node_spacing: f32,

    /// Gap between consecutive ranks
    rank_spacing: f32,
}

impl LayoutConfig {
    pub fn new(engine: LayoutEngine, node_spacing: f32, rank_spacing: f32) -> Self {
        Self {
            engine,
            node_spacing,
            rank_spacing,
        }
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            node_spacing: 50.0,
            rank_spacing: 80.0,
        }
    }
}

/// Visual styling of rendered diagrams.
///
/// Colors are kept as strings and parsed on access, so an invalid color is
/// reported when a diagram is rendered rather than when the file is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    font_family: String,
    icon_size: f32,
    edge_color: String,
    cluster_fill: String,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` for a transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Edge length of the square icon glyphs
    pub fn icon_size(&self) -> f32 {
        self.icon_size
    }

    pub fn edge_color(&self) -> Result<Color, String> {
        Color::new(&self.edge_color).map_err(|err| format!("Invalid edge color in config: {err}"))
    }

    pub fn cluster_fill(&self) -> Result<Color, String> {
        Color::new(&self.cluster_fill)
            .map_err(|err| format!("Invalid cluster fill in config: {err}"))
    }

    // Graphviz takes the configured spellings as they are.

    #[cfg(feature = "graphviz")]
    pub(crate) fn background_color_str(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    #[cfg(feature = "graphviz")]
    pub(crate) fn edge_color_str(&self) -> &str {
        &self.edge_color
    }

    #[cfg(feature = "graphviz")]
    pub(crate) fn cluster_fill_str(&self) -> &str {
        &self.cluster_fill
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_family: "sans-serif".to_string(),
            icon_size: 64.0,
            edge_color: "#7B8894".to_string(),
            cluster_fill: "#E5F5FD".to_string(),
        }
    }
}

/// Where and how images are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    directory: PathBuf,
    formats: Vec<OutputFormat>,
    scale: f32,
}

impl OutputConfig {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    /// Raster scale factor applied to PNG output
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
    }

    pub fn set_formats(&mut self, formats: Vec<OutputFormat>) {
        self.formats = formats;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            formats: vec![OutputFormat::Png],
            scale: 1.0,
        }
    }
}

/// Image format of a written diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    /// File extension, without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(format!("Unsupported output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().engine(), LayoutEngine::Basic);
        assert_approx_eq!(f32, config.layout().node_spacing(), 50.0);
        assert_approx_eq!(f32, config.layout().rank_spacing(), 80.0);
        assert_eq!(config.style().font_family(), "sans-serif");
        assert_approx_eq!(f32, config.style().icon_size(), 64.0);
        assert!(config.style().edge_color().is_ok());
        assert!(config.style().cluster_fill().is_ok());
        assert_eq!(config.output().directory(), Path::new(DEFAULT_OUTPUT_DIR));
        assert_approx_eq!(f32, config.output().scale(), 1.0);
    }

    #[test]
    fn test_invalid_colors_are_reported() {
        let style = StyleConfig {
            background_color: Some("nope".to_string()),
            edge_color: "also nope".to_string(),
            ..StyleConfig::default()
        };
        assert!(style.background_color().is_err());
        assert!(style.edge_color().unwrap_err().contains("edge color"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("PNG".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("svg".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Svg.to_string(), "svg");
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.output_mut().set_directory("/tmp/out");
        config.output_mut().set_formats(vec![OutputFormat::Svg, OutputFormat::Png]);
        assert_eq!(config.output().directory(), Path::new("/tmp/out"));
        assert_eq!(config.output().formats().len(), 2);
    }
}
