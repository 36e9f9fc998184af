//! Draw definitions derived from the style configuration.
//!
//! Layout and export must measure and draw with identical definitions, so
//! both receive the same [`Theme`].

use caffeine_diagrams_core::{
    color::Color,
    draw::{ArrowDefinition, ClusterDefinition, StrokeDefinition, TextDefinition},
    geometry::Insets,
};

use crate::{config::StyleConfig, error::CaffeineError};

const NODE_LABEL_SIZE: u16 = 13;
const CLUSTER_TITLE_SIZE: u16 = 13;
const EDGE_LABEL_SIZE: u16 = 12;
const DIAGRAM_TITLE_SIZE: u16 = 20;

#[derive(Debug, Clone)]
pub struct Theme {
    icon_size: f32,
    background: Option<Color>,
    node_label: TextDefinition,
    cluster: ClusterDefinition,
    arrow: ArrowDefinition,
    title: TextDefinition,
}

impl Theme {
    /// Builds the theme for `style`.
    ///
    /// # Errors
    ///
    /// Returns [`CaffeineError::Config`] when a configured color does not parse.
    pub fn from_style(style: &StyleConfig) -> Result<Self, CaffeineError> {
        let background = style.background_color().map_err(CaffeineError::Config)?;
        let edge_color = style.edge_color().map_err(CaffeineError::Config)?;
        let cluster_fill = style.cluster_fill().map_err(CaffeineError::Config)?;

        let text = |size: u16| {
            let mut definition = TextDefinition::new();
            definition.set_font_family(style.font_family());
            definition.set_font_size(size);
            definition
        };

        let node_label = text(NODE_LABEL_SIZE);

        let mut cluster_title = text(CLUSTER_TITLE_SIZE);
        cluster_title.set_color(Color::new("#2D3E50").ok());
        let cluster = ClusterDefinition::new(
            cluster_fill,
            StrokeDefinition::dashed(edge_color, 1.0),
            cluster_title,
        );

        let mut edge_label = text(EDGE_LABEL_SIZE);
        edge_label.set_color(Some(edge_color));
        edge_label.set_background_color(Color::new("white").ok().map(|c| c.with_alpha(0.85)));
        edge_label.set_padding(Insets::new(2.0, 4.0, 2.0, 4.0));
        let arrow = ArrowDefinition::new(StrokeDefinition::solid(edge_color, 1.5), edge_label);

        let title = text(DIAGRAM_TITLE_SIZE);

        Ok(Self {
            icon_size: style.icon_size(),
            background,
            node_label,
            cluster,
            arrow,
            title,
        })
    }

    pub fn icon_size(&self) -> f32 {
        self.icon_size
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn node_label(&self) -> &TextDefinition {
        &self.node_label
    }

    pub fn cluster(&self) -> &ClusterDefinition {
        &self.cluster
    }

    pub fn arrow(&self) -> &ArrowDefinition {
        &self.arrow
    }

    pub fn title(&self) -> &TextDefinition {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_builds() {
        let theme = Theme::from_style(&StyleConfig::default()).unwrap();
        assert!(theme.background().is_none());
        assert_eq!(theme.title().font_size(), DIAGRAM_TITLE_SIZE);
        assert_eq!(theme.node_label().font_family(), "sans-serif");
    }
}
