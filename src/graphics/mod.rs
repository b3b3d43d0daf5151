//!
//! Graphics subsystem: packed 1-bit bitmaps, the BitBlt engine, and the
//! adapter that hands finished bitmaps to a display.

pub mod bitblt;
pub mod bitmap;
pub mod display;
pub mod geometry;

pub use bitblt::{BitBlt, BitBltError, BlitPlan, CombinationRule, Direction, SourceBits};
pub use bitmap::{halftone, Bitmap, BitmapError};
pub use display::{to_ascii, to_image, DisplayError, Screen};
pub use geometry::{Extent, Point, Rect};
