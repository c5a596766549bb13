pub mod buffer;
pub mod color_table;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hsb;
pub mod navigation;
pub mod oscillator;

pub use buffer::RenderBuffer;
pub use color_table::{ColorTable, Rgb};
pub use engine::{Engine, EngineConfig};
pub use error::RenderError;
pub use grid::PixelGrid;
pub use hsb::hsb_to_rgb;
pub use navigation::{Frame, NavigationStack};
pub use oscillator::{Channel, ChannelLimits, ColorComponent};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
