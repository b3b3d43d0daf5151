//! Packed 1-bit-per-pixel bitmaps
//!
//! A [`Bitmap`] is a fixed-size monochrome raster laid over a byte buffer
//! that it does not own. The storage parameter decides what the view may do:
//!
//! - `Bitmap<&[u8]>`: read-only view (BitBlt source, halftone)
//! - `Bitmap<&mut [u8]>`: writable view (BitBlt destination)
//! - `Bitmap<Vec<u8>>`: owned storage, for callers that want one
//!
//! Layout (Smalltalk-80 Form layout):
//! - Rows are `line_width` pixels long, `line_width` being the pixel width
//!   rounded up to a whole number of 16-bit words.
//! - Pixel `x` of a row lives in byte `x / 8`, bit `7 - x % 8` (MSB first).
//! - A word is two bytes in big-endian order, so word bit 15 is the
//!   leftmost pixel covered by the word.

use std::fmt;

use crate::graphics::geometry::Rect;

/// Pixels packed into one byte.
pub const PIXELS_PER_BYTE: u32 = 8;
/// Pixels packed into one 16-bit word.
pub const PIXELS_PER_WORD: u32 = 16;
/// Largest width or height a bitmap may declare.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Errors related to bitmap access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitmapError {
    #[error("Invalid bitmap dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Buffer too small: {required} words required, {available} available")]
    BufferTooSmall { required: usize, available: usize },

    #[error("Word index out of range: {index} (word length {len})")]
    WordIndexOutOfRange { index: usize, len: usize },

    #[error("Pixel out of range: ({x}, {y}) in {line_width}x{height}")]
    PixelOutOfRange {
        x: u32,
        y: u32,
        line_width: u32,
        height: u32,
    },

    #[error("Scan line out of range: {y} (height {height})")]
    ScanLineOutOfRange { y: u32, height: u32 },
}

/// Read word `index` of a packed byte buffer.
pub(crate) fn read_word(bytes: &[u8], index: usize) -> Option<u16> {
    let start = index.checked_mul(2)?;
    let pair = bytes.get(start..start.checked_add(2)?)?;
    Some(u16::from_be_bytes([pair[0], pair[1]]))
}

/// Store word `index` of a packed byte buffer.
pub(crate) fn write_word(bytes: &mut [u8], index: usize, value: u16) -> Option<()> {
    let start = index.checked_mul(2)?;
    let pair = bytes.get_mut(start..start.checked_add(2)?)?;
    pair.copy_from_slice(&value.to_be_bytes());
    Some(())
}

/// Classic Smalltalk-80 halftone masks, as row words.
///
/// Pass one of these to [`Bitmap::halftone`]. Patterns repeat vertically,
/// so a two-row mask behaves exactly like its 16-row expansion.
pub mod halftone {
    pub const BLACK: [u16; 1] = [0xFFFF];
    pub const WHITE: [u16; 1] = [0x0000];
    pub const DARK_GRAY: [u16; 2] = [0x7777, 0xDDDD];
    pub const GRAY: [u16; 2] = [0xAAAA, 0x5555];
    pub const LIGHT_GRAY: [u16; 2] = [0x8888, 0x2222];
    pub const VERY_LIGHT_GRAY: [u16; 4] = [0x8888, 0x0000, 0x2222, 0x0000];
}

/// Fixed-size 1-bit raster over a word-addressable buffer.
#[derive(Clone)]
pub struct Bitmap<B> {
    width: u32,
    height: u32,
    line_width: u32,
    word_len: usize,
    buffer: B,
}

impl<B: AsRef<[u8]>> Bitmap<B> {
    /// Bind `buffer` as a `width` x `height` bitmap of `word_len` words.
    ///
    /// The buffer contents are not inspected; only the declared sizes are
    /// checked, so that every later access can be bounds-checked against
    /// `word_len`.
    pub fn new(buffer: B, word_len: usize, width: u32, height: u32) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BitmapError::InvalidDimensions { width, height });
        }

        let line_width = width.div_ceil(PIXELS_PER_WORD) * PIXELS_PER_WORD;
        let raster = (line_width / PIXELS_PER_WORD) as usize;
        let required = raster
            .checked_mul(height as usize)
            .ok_or(BitmapError::InvalidDimensions { width, height })?;
        if word_len < required {
            return Err(BitmapError::BufferTooSmall {
                required,
                available: word_len,
            });
        }

        let available = buffer.as_ref().len() / 2;
        if word_len > available {
            return Err(BitmapError::BufferTooSmall {
                required: word_len,
                available,
            });
        }

        Ok(Self {
            width,
            height,
            line_width,
            word_len,
            buffer,
        })
    }

    /// Bind `buffer` using every whole word it holds.
    pub fn with_buffer(buffer: B, width: u32, height: u32) -> Result<Self, BitmapError> {
        let word_len = buffer.as_ref().len() / 2;
        Self::new(buffer, word_len, width, height)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in pixels; always a multiple of 16
    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    /// Buffer length in 16-bit words
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// Words per row
    pub fn raster(&self) -> usize {
        (self.line_width / PIXELS_PER_WORD) as usize
    }

    /// The bitmap's own bounds, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(0, 0, self.width as i32, self.height as i32)
    }

    /// The `word_len * 2` bytes covered by this bitmap.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.word_len * 2]
    }

    /// Word `index` of the buffer, row-major, 0-based.
    pub fn word_at(&self, index: usize) -> Result<u16, BitmapError> {
        read_word(self.bytes(), index).ok_or(BitmapError::WordIndexOutOfRange {
            index,
            len: self.word_len,
        })
    }

    /// Whether the pixel at (x, y) is set.
    pub fn test(&self, x: u32, y: u32) -> Result<bool, BitmapError> {
        let (byte, mask) = self.pixel_address(x, y)?;
        Ok(self.bytes()[byte] & mask != 0)
    }

    /// Bytes of row `y`.
    pub fn scan_line(&self, y: u32) -> Result<&[u8], BitmapError> {
        let range = self.scan_line_range(y)?;
        Ok(&self.bytes()[range])
    }

    /// Borrow as a read-only view.
    pub fn as_view(&self) -> Bitmap<&[u8]> {
        Bitmap {
            width: self.width,
            height: self.height,
            line_width: self.line_width,
            word_len: self.word_len,
            buffer: self.bytes(),
        }
    }

    /// Copy into a bitmap that owns its storage.
    pub fn to_owned_bitmap(&self) -> Bitmap<Vec<u8>> {
        Bitmap {
            width: self.width,
            height: self.height,
            line_width: self.line_width,
            word_len: self.word_len,
            buffer: self.bytes().to_vec(),
        }
    }

    /// Give the underlying buffer back.
    pub fn into_inner(self) -> B {
        self.buffer
    }

    fn pixel_address(&self, x: u32, y: u32) -> Result<(usize, u8), BitmapError> {
        if x >= self.line_width || y >= self.height {
            return Err(BitmapError::PixelOutOfRange {
                x,
                y,
                line_width: self.line_width,
                height: self.height,
            });
        }

        let bit_index = y as usize * self.line_width as usize + x as usize;
        let byte = bit_index / PIXELS_PER_BYTE as usize;
        let mask = 1u8 << (7 - x % PIXELS_PER_BYTE);
        if byte >= self.word_len * 2 {
            return Err(BitmapError::WordIndexOutOfRange {
                index: byte / 2,
                len: self.word_len,
            });
        }
        Ok((byte, mask))
    }

    fn scan_line_range(&self, y: u32) -> Result<std::ops::Range<usize>, BitmapError> {
        if y >= self.height {
            return Err(BitmapError::ScanLineOutOfRange {
                y,
                height: self.height,
            });
        }
        let row_bytes = (self.line_width / PIXELS_PER_BYTE) as usize;
        let start = y as usize * row_bytes;
        Ok(start..start + row_bytes)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Bitmap<B> {
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.word_len * 2;
        &mut self.buffer.as_mut()[..len]
    }

    /// Store `value` into word `index`.
    pub fn word_at_put(&mut self, index: usize, value: u16) -> Result<(), BitmapError> {
        let len = self.word_len;
        write_word(self.bytes_mut(), index, value)
            .ok_or(BitmapError::WordIndexOutOfRange { index, len })
    }

    /// Set or clear the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, on: bool) -> Result<(), BitmapError> {
        let (byte, mask) = self.pixel_address(x, y)?;
        let bytes = self.bytes_mut();
        if on {
            bytes[byte] |= mask;
        } else {
            bytes[byte] &= !mask;
        }
        Ok(())
    }

    /// Mutable bytes of row `y`.
    pub fn scan_line_mut(&mut self, y: u32) -> Result<&mut [u8], BitmapError> {
        let range = self.scan_line_range(y)?;
        Ok(&mut self.bytes_mut()[range])
    }

    /// Set or clear every bit of the buffer, row padding included.
    pub fn fill(&mut self, on: bool) {
        self.bytes_mut().fill(if on { 0xFF } else { 0x00 });
    }

    /// Borrow as a writable view.
    pub fn as_view_mut(&mut self) -> Bitmap<&mut [u8]> {
        let len = self.word_len * 2;
        Bitmap {
            width: self.width,
            height: self.height,
            line_width: self.line_width,
            word_len: self.word_len,
            buffer: &mut self.buffer.as_mut()[..len],
        }
    }
}

impl Bitmap<Vec<u8>> {
    /// Allocate an all-clear bitmap.
    pub fn zeroed(width: u32, height: u32) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BitmapError::InvalidDimensions { width, height });
        }
        let raster = width.div_ceil(PIXELS_PER_WORD) as usize;
        let word_len = raster
            .checked_mul(height as usize)
            .ok_or(BitmapError::InvalidDimensions { width, height })?;
        Self::new(vec![0; word_len * 2], word_len, width, height)
    }

    /// Build a 16-pixel-wide bitmap, one word per row.
    pub fn from_row_words(rows: &[u16]) -> Result<Self, BitmapError> {
        let buffer: Vec<u8> = rows.iter().flat_map(|row| row.to_be_bytes()).collect();
        Self::new(buffer, rows.len(), PIXELS_PER_WORD, rows.len() as u32)
    }

    /// Build a halftone pattern from one of the [`halftone`] masks (or any
    /// other list of row words).
    pub fn halftone(rows: &[u16]) -> Result<Self, BitmapError> {
        Self::from_row_words(rows)
    }
}

impl<A: AsRef<[u8]>, B: AsRef<[u8]>> PartialEq<Bitmap<B>> for Bitmap<A> {
    fn eq(&self, other: &Bitmap<B>) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.word_len == other.word_len
            && self.bytes() == other.bytes()
    }
}

impl<B: AsRef<[u8]>> Eq for Bitmap<B> {}

impl<B> fmt::Debug for Bitmap<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("line_width", &self.line_width)
            .field("word_len", &self.word_len)
            .finish()
    }
}
