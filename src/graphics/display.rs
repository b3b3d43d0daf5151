//! Display adapter
//!
//! Turns finished bitmaps into something a presentation layer can show:
//!
//! - [`to_image`]: a bitmap (or a sub-rectangle of it) as an 8-bit
//!   grayscale `image::GrayImage`, optionally upscaled
//! - [`to_ascii`]: a text rendering, handy in logs and tests
//! - [`Screen`]: the latest frame plus an optional cursor overlay, shared
//!   between the thread that draws and the thread that presents
//!
//! Window management and event pumping belong to the consumer; nothing
//! here opens a window.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use parking_lot::Mutex;

use crate::config::RenderOptions;
use crate::graphics::bitblt::{BitBlt, BitBltError, CombinationRule};
use crate::graphics::bitmap::{Bitmap, BitmapError, PIXELS_PER_BYTE};
use crate::graphics::geometry::{Extent, Point, Rect};

/// Errors related to presenting bitmaps
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    #[error("Region out of bounds: {rect:?} in {width}x{height}")]
    RegionOutOfBounds { rect: Rect, width: u32, height: u32 },

    #[error("Invalid scale factor: {0}")]
    InvalidScale(u32),

    #[error(transparent)]
    Bitmap(#[from] BitmapError),

    #[error(transparent)]
    BitBlt(#[from] BitBltError),
}

fn check_region<B: AsRef<[u8]>>(
    bitmap: &Bitmap<B>,
    region: Option<Rect>,
) -> Result<Rect, DisplayError> {
    let rect = region.unwrap_or_else(|| bitmap.bounds());
    if rect.is_empty() || !bitmap.bounds().contains_rect(&rect) {
        return Err(DisplayError::RegionOutOfBounds {
            rect,
            width: bitmap.width(),
            height: bitmap.height(),
        });
    }
    Ok(rect)
}

fn pixel_on(line: &[u8], x: u32) -> bool {
    let byte = line[(x / PIXELS_PER_BYTE) as usize];
    byte >> (7 - x % PIXELS_PER_BYTE) & 1 == 1
}

/// Render `region` (the whole bitmap if `None`) as a grayscale image.
///
/// Set bits become `options.ink`, clear bits `options.paper` (swapped when
/// `options.invert` is on). The result is scaled up by `options.scale`
/// with nearest-neighbour sampling.
pub fn to_image<B: AsRef<[u8]>>(
    bitmap: &Bitmap<B>,
    region: Option<Rect>,
    options: &RenderOptions,
) -> Result<GrayImage, DisplayError> {
    let rect = check_region(bitmap, region)?;
    if options.scale == 0 {
        return Err(DisplayError::InvalidScale(options.scale));
    }

    let (ink, paper) = if options.invert {
        (options.paper, options.ink)
    } else {
        (options.ink, options.paper)
    };

    let width = rect.width() as u32;
    let height = rect.height() as u32;
    let x0 = rect.x() as u32;
    let y0 = rect.y() as u32;

    let mut image = GrayImage::new(width, height);
    for y in 0..height {
        let line = bitmap.scan_line(y0 + y)?;
        for x in 0..width {
            let value = if pixel_on(line, x0 + x) { ink } else { paper };
            image.put_pixel(x, y, Luma([value]));
        }
    }

    if options.scale > 1 {
        let scaled_width = width
            .checked_mul(options.scale)
            .ok_or(DisplayError::InvalidScale(options.scale))?;
        let scaled_height = height
            .checked_mul(options.scale)
            .ok_or(DisplayError::InvalidScale(options.scale))?;
        image = imageops::resize(&image, scaled_width, scaled_height, FilterType::Nearest);
    }

    Ok(image)
}

/// Render a bitmap as text: `#` for set pixels, `.` for clear ones, one
/// line per row. Row padding beyond `width` is not shown.
pub fn to_ascii<B: AsRef<[u8]>>(bitmap: &Bitmap<B>) -> String {
    let mut out = String::with_capacity(((bitmap.width() + 1) * bitmap.height()) as usize);
    for y in 0..bitmap.height() {
        if y > 0 {
            out.push('\n');
        }
        let Ok(line) = bitmap.scan_line(y) else {
            break;
        };
        for x in 0..bitmap.width() {
            out.push(if pixel_on(line, x) { '#' } else { '.' });
        }
    }
    out
}

#[derive(Debug)]
struct Cursor {
    bitmap: Bitmap<Vec<u8>>,
    position: Point,
    rule: CombinationRule,
}

#[derive(Debug, Default)]
struct ScreenState {
    frame: Option<Bitmap<Vec<u8>>>,
    cursor: Option<Cursor>,
    generation: u64,
}

impl ScreenState {
    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Presentation-side model of a monochrome screen.
///
/// Holds a snapshot of the most recent frame and an optional cursor that
/// is composited over it with an ordinary BitBlt. All methods take `&self`
/// and may be called from different threads.
#[derive(Debug, Default)]
pub struct Screen {
    state: Mutex<ScreenState>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the frame with a copy of `bitmap`.
    pub fn set_bitmap<B: AsRef<[u8]>>(&self, bitmap: &Bitmap<B>) {
        let mut state = self.state.lock();
        state.frame = Some(bitmap.to_owned_bitmap());
        state.touch();
    }

    /// Install a cursor image, drawn with `rule` at the current cursor
    /// position (the origin if no cursor was set before).
    pub fn set_cursor<B: AsRef<[u8]>>(&self, bitmap: &Bitmap<B>, rule: CombinationRule) {
        let mut state = self.state.lock();
        let position = state
            .cursor
            .as_ref()
            .map_or(Point::origin(), |cursor| cursor.position);
        state.cursor = Some(Cursor {
            bitmap: bitmap.to_owned_bitmap(),
            position,
            rule,
        });
        state.touch();
    }

    /// Move the cursor's top-left corner. Ignored without a cursor.
    pub fn move_cursor(&self, position: Point) {
        let mut state = self.state.lock();
        if let Some(cursor) = state.cursor.as_mut() {
            if cursor.position != position {
                cursor.position = position;
                state.touch();
            }
        }
    }

    pub fn clear_cursor(&self) {
        let mut state = self.state.lock();
        if state.cursor.take().is_some() {
            state.touch();
        }
    }

    /// Counter bumped by every visible change.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// The frame with the cursor composited on top, or `None` before the
    /// first frame arrives.
    pub fn compose(&self) -> Result<Option<Bitmap<Vec<u8>>>, DisplayError> {
        let state = self.state.lock();
        let Some(frame) = state.frame.as_ref() else {
            return Ok(None);
        };

        let mut composed = frame.to_owned_bitmap();
        if let Some(cursor) = state.cursor.as_ref() {
            BitBlt::new(&mut composed)
                .with_source(&cursor.bitmap)
                .with_rule(cursor.rule)
                .with_dest_origin(cursor.position)
                .with_extent(Extent::new(
                    cursor.bitmap.width() as i32,
                    cursor.bitmap.height() as i32,
                ))
                .copy_bits()?;
        }
        Ok(Some(composed))
    }

    /// [`Screen::compose`] followed by [`to_image`].
    pub fn render(&self, options: &RenderOptions) -> Result<Option<GrayImage>, DisplayError> {
        match self.compose()? {
            Some(frame) => Ok(Some(to_image(&frame, None, options)?)),
            None => Ok(None),
        }
    }
}
