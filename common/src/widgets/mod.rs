//! Drawing components for the LED matrix.
//!
//! All widgets draw onto a [`Canvas`](crate::canvas::Canvas) and rely on its
//! clipping policy for anything that falls off the edge.

mod primitives;
mod weather;

pub use primitives::{draw_circle, draw_rings};
pub use weather::{Conditions, WeatherPanel, draw_weather_panel, temperature_label};
