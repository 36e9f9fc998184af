//! PNG export through `resvg`.

use std::sync::{Arc, OnceLock};

use log::{debug, info};
use resvg::usvg::fontdb;

use crate::export;

/// System fonts are scanned once per process.
static FONT_DATABASE: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

fn font_database() -> Arc<fontdb::Database> {
    FONT_DATABASE
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            info!(faces = db.len(); "Loaded system fonts for rasterization");
            Arc::new(db)
        })
        .clone()
}

/// Rasterizes `svg` to PNG bytes, multiplying its size by `scale`.
///
/// # Errors
///
/// Returns [`export::Error::Rasterize`] if `scale` is not a positive finite
/// number or the scaled image is empty, and [`export::Error::Render`] if the
/// SVG cannot be parsed.
pub fn rasterize(svg: &str, scale: f32) -> Result<Vec<u8>, export::Error> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(export::Error::Rasterize(format!(
            "scale must be a positive number, got {scale}"
        )));
    }

    let opts = resvg::usvg::Options {
        fontdb: font_database(),
        ..Default::default()
    };
    let tree = resvg::usvg::Tree::from_str(svg, &opts)
        .map_err(|err| export::Error::Render(format!("invalid SVG: {err}")))?;
    let size = tree.size();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = (size.width() * scale).ceil() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        export::Error::Rasterize(format!("failed to create pixmap {width}x{height}"))
    })?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let png = pixmap
        .encode_png()
        .map_err(|err| export::Error::Rasterize(format!("PNG encoding failed: {err}")))?;
    debug!(width, height, bytes = png.len(); "SVG rasterized");
    Ok(png)
}

#[cfg(test)]
mod tests {
    use caffeine_diagrams_core::{
        color::Color,
        draw::{Drawable, Text, TextDefinition},
        geometry::{Insets, Point},
    };

    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect width="40" height="20" fill="#E5F5FD"/></svg>"##;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn dimensions(png: &[u8]) -> (u32, u32) {
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (width, height)
    }

    #[test]
    fn test_rasterize_produces_png() {
        let png = rasterize(SQUARE, 1.0).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);
        assert_eq!(dimensions(&png), (40, 20));
    }

    #[test]
    fn test_scale_multiplies_dimensions() {
        let png = rasterize(SQUARE, 2.0).unwrap();
        assert_eq!(dimensions(&png), (80, 40));
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                rasterize(SQUARE, scale),
                Err(export::Error::Rasterize(_))
            ));
        }
    }

    #[test]
    fn test_invalid_svg_is_rejected() {
        assert!(matches!(
            rasterize("not svg", 1.0),
            Err(export::Error::Render(_))
        ));
    }

    #[test]
    fn test_translucent_label_backdrop_stays_light() {
        let mut label = TextDefinition::new();
        label.set_padding(Insets::uniform(10.0));
        label.set_background_color(Some(Color::new("white").unwrap().with_alpha(0.85)));
        let text = Text::new(&label, "저장");

        let position = Point::new(100.0, 50.0);
        let backdrop = position.to_bounds(text.calculate_size());
        let document = text
            .render_to_layers(position)
            .render()
            .into_iter()
            .fold(
                svg::Document::new()
                    .set("width", 200)
                    .set("height", 100)
                    .set("viewBox", (0, 0, 200, 100)),
                svg::Document::add,
            );

        let png = rasterize(&document.to_string(), 1.0).unwrap();
        let pixmap = resvg::tiny_skia::Pixmap::decode_png(&png).unwrap();
        // Inside the padding, clear of the glyphs
        let pixel = pixmap
            .pixel(backdrop.min_x() as u32 + 3, backdrop.min_y() as u32 + 3)
            .unwrap()
            .demultiply();

        assert!(pixel.red() > 240, "backdrop rendered dark: {pixel:?}");
        assert!(pixel.green() > 240 && pixel.blue() > 240);
        assert!((200..=230).contains(&pixel.alpha()), "alpha was {}", pixel.alpha());
    }
}
