// BitBlt over packed 1-bit bitmaps, plus a small demo front end

pub mod cli;
pub mod config;
pub mod demo;
pub mod graphics;
pub mod logging;

pub use cli::Cli;
pub use config::{Options, RenderOptions};
pub use demo::Scene;
pub use graphics::{BitBlt, BitBltError, Bitmap, BitmapError, CombinationRule, SourceBits};
pub use logging::LogLevel;
