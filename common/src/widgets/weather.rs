//! Weather panel layout for the steady-state dashboard.
//!
//! Layout on the 64x64 matrix (all text 7px, anchors are top-left):
//!
//! ```text
//! (5,10)  Chicago
//! (5,20)  12.5 C
//! (5,30)  +------+
//!         | icon |   20x20, nearest-neighbor resized
//!         +------+
//! ```
//!
//! When no icon is available the icon slot shows `No icon` at (5,40). When
//! no weather record has arrived yet the panel shows the configured location
//! and `No data`.

use alloc::string::String;
use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb888;
use heapless::String as LineBuf;

use crate::canvas::Canvas;
use crate::config::{ICON_SIZE, ICON_Y, LOCATION_Y, NO_ICON_Y, PANEL_X, TEMPERATURE_Y};
use crate::fonts::Font;
use crate::image::{DecodedImage, draw_image};

/// Current conditions, validated into a fixed shape at the fetch boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Conditions {
    pub location_name: String,
    pub temperature_celsius: f32,
    pub condition_icon_url: String,
}

/// Everything the panel needs to draw one frame.
#[derive(Clone, Debug, Default)]
pub struct WeatherPanel {
    /// Last weather record received, if any.
    pub conditions: Option<Conditions>,
    /// Decoded condition icon for `conditions`, if the fetch succeeded.
    pub icon: Option<DecodedImage>,
}

/// Format a temperature line, e.g. `12.5 C`.
pub fn temperature_label(celsius: f32) -> LineBuf<16> {
    let mut line = LineBuf::new();
    let _ = write!(line, "{celsius:.1} C");
    line
}

/// Draw the weather panel onto `canvas`.
///
/// `fallback_location` is shown when no conditions have been received.
pub fn draw_weather_panel(
    canvas: &mut Canvas,
    font: Font,
    panel: &WeatherPanel,
    fallback_location: &str,
    color: Rgb888,
) {
    let Some(conditions) = &panel.conditions else {
        font.draw(canvas, PANEL_X, LOCATION_Y, fallback_location, color);
        font.draw(canvas, PANEL_X, TEMPERATURE_Y, "No data", color);
        return;
    };

    font.draw(canvas, PANEL_X, LOCATION_Y, &conditions.location_name, color);
    font.draw(
        canvas,
        PANEL_X,
        TEMPERATURE_Y,
        &temperature_label(conditions.temperature_celsius),
        color,
    );

    match &panel.icon {
        Some(icon) => draw_image(canvas, icon, ICON_SIZE, ICON_SIZE, PANEL_X, ICON_Y),
        None => {
            font.draw(canvas, PANEL_X, NO_ICON_Y, "No icon", color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, CYAN, RED};
    use crate::config::PANEL_FONT_HEIGHT;

    fn conditions() -> Conditions {
        Conditions {
            location_name: "Chicago".into(),
            temperature_celsius: 12.5,
            condition_icon_url: "//cdn.weatherapi.com/weather/64x64/day/116.png".into(),
        }
    }

    fn lit_in(
        canvas: &Canvas,
        rows: core::ops::Range<i32>,
    ) -> usize {
        rows.flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.get_pixel(x, y) != BLACK)
            .count()
    }

    #[test]
    fn test_temperature_label_format() {
        assert_eq!(temperature_label(12.5).as_str(), "12.5 C");
        assert_eq!(temperature_label(-3.0).as_str(), "-3.0 C");
        assert_eq!(temperature_label(-100.0).as_str(), "-100.0 C", "accepted extremes fit the buffer");
    }

    #[test]
    fn test_icon_drawn_in_icon_slot() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let font = Font::load(PANEL_FONT_HEIGHT).unwrap();
        let panel = WeatherPanel {
            conditions: Some(conditions()),
            icon: Some(DecodedImage::still(2, 2, vec![RED; 4]).unwrap()),
        };

        draw_weather_panel(&mut canvas, font, &panel, "Nowhere", CYAN);

        for y in 30..50 {
            for x in 5..25 {
                assert_eq!(canvas.get_pixel(x, y), RED);
            }
        }
        assert!(lit_in(&canvas, 10..30) > 0, "location and temperature lines drawn");
    }

    #[test]
    fn test_missing_icon_falls_back_to_text() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let font = Font::load(PANEL_FONT_HEIGHT).unwrap();
        let panel = WeatherPanel { conditions: Some(conditions()), icon: None };

        draw_weather_panel(&mut canvas, font, &panel, "Nowhere", CYAN);

        assert!(lit_in(&canvas, 40..56) > 0, "No icon text below its anchor");
        assert!(canvas.pixels().iter().all(|&p| p == BLACK || p == CYAN));
    }

    #[test]
    fn test_no_conditions_shows_fallback() {
        let mut with_fallback = Canvas::new(64, 64).unwrap();
        let mut expected = Canvas::new(64, 64).unwrap();
        let font = Font::load(PANEL_FONT_HEIGHT).unwrap();

        draw_weather_panel(&mut with_fallback, font, &WeatherPanel::default(), "Chicago", CYAN);
        font.draw(&mut expected, 5, 10, "Chicago", CYAN);
        font.draw(&mut expected, 5, 20, "No data", CYAN);

        assert_eq!(with_fallback, expected);
        assert_eq!(lit_in(&with_fallback, 38..64), 0, "icon slot left blank");
    }
}
