//! BitBlt: rectangular raster copy between 1-bit bitmaps
//!
//! This is the Smalltalk-80 bit-block-transfer operator. A [`BitBlt`]
//! request names a destination bitmap, an optional source bitmap, an
//! optional halftone pattern, a [`CombinationRule`] and the geometry of the
//! transfer. [`BitBlt::copy_bits`] clips the geometry, computes a
//! [`BlitPlan`] and runs the word-at-a-time copy loop.
//!
//! # Example
//!
//! ```
//! use bitblt::graphics::{BitBlt, Bitmap, CombinationRule, Extent, Point};
//!
//! let mut screen = Bitmap::zeroed(16, 16).unwrap();
//! let mut brush = Bitmap::zeroed(8, 8).unwrap();
//! brush.fill(true);
//!
//! let touched = BitBlt::new(&mut screen)
//!     .with_source(&brush)
//!     .with_rule(CombinationRule::STORE)
//!     .with_dest_origin(Point::new(4, 4))
//!     .with_extent(Extent::new(8, 8))
//!     .copy_bits()
//!     .unwrap();
//!
//! assert!(touched.is_some());
//! assert!(screen.test(4, 4).unwrap());
//! assert!(!screen.test(12, 4).unwrap());
//! ```
//!
//! A source that is the destination itself is requested with
//! [`BitBlt::with_source_from_destination`]; the plan then picks a
//! traversal order under which overlapping regions copy as if they were
//! separate buffers.

mod copy_loop;
pub mod plan;
pub mod rule;

pub use plan::{
    BlitGeometry, BlitPlan, ClippedRegion, Direction, EdgeMasks, Layout, SourceLayout, ALL_ONES,
};
pub use rule::CombinationRule;

use crate::graphics::bitmap::{Bitmap, BitmapError};
use crate::graphics::geometry::{Extent, Point, Rect};

use copy_loop::SourceWords;

/// Errors related to BitBlt requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitBltError {
    #[error("Invalid combination rule: {0} (expected 0..=15)")]
    InvalidRule(i32),

    #[error(transparent)]
    Bitmap(#[from] BitmapError),
}

/// Where a BitBlt reads its source bits from.
#[derive(Debug, Clone, Default)]
pub enum SourceBits<'a> {
    /// No source: every source bit is set, so the halftone and rule alone
    /// decide what gets painted.
    #[default]
    Absent,
    /// A separate bitmap.
    Bitmap(Bitmap<&'a [u8]>),
    /// The destination bitmap itself (in-place copy, may overlap).
    Destination,
}

/// A single BitBlt request.
///
/// Fields are public; the `with_*` methods are shorthand for setting them.
/// [`BitBlt::new`] starts with no source, no halftone, the
/// [`CombinationRule::STORE`] rule, both origins at (0, 0), and the extent
/// and clip rectangle covering the whole destination.
#[derive(Debug)]
pub struct BitBlt<'a> {
    pub dest: Bitmap<&'a mut [u8]>,
    pub source: SourceBits<'a>,
    /// Pattern ANDed into every source word; absent means all ones
    pub halftone: Option<Bitmap<&'a [u8]>>,
    pub rule: CombinationRule,
    pub dest_origin: Point,
    pub source_origin: Point,
    pub extent: Extent,
    pub clip: Rect,
}

impl<'a> BitBlt<'a> {
    pub fn new<B: AsRef<[u8]> + AsMut<[u8]>>(dest: &'a mut Bitmap<B>) -> Self {
        let dest = dest.as_view_mut();
        let bounds = dest.bounds();
        Self {
            dest,
            source: SourceBits::Absent,
            halftone: None,
            rule: CombinationRule::STORE,
            dest_origin: Point::origin(),
            source_origin: Point::origin(),
            extent: bounds.extent,
            clip: bounds,
        }
    }

    pub fn with_source<B: AsRef<[u8]>>(mut self, source: &'a Bitmap<B>) -> Self {
        self.source = SourceBits::Bitmap(source.as_view());
        self
    }

    /// Read the source from the destination bitmap.
    pub fn with_source_from_destination(mut self) -> Self {
        self.source = SourceBits::Destination;
        self
    }

    pub fn with_halftone<B: AsRef<[u8]>>(mut self, halftone: &'a Bitmap<B>) -> Self {
        self.halftone = Some(halftone.as_view());
        self
    }

    pub fn with_rule(mut self, rule: CombinationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_dest_origin(mut self, origin: Point) -> Self {
        self.dest_origin = origin;
        self
    }

    pub fn with_source_origin(mut self, origin: Point) -> Self {
        self.source_origin = origin;
        self
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = clip;
        self
    }

    pub fn geometry(&self) -> BlitGeometry {
        BlitGeometry {
            dest_origin: self.dest_origin,
            source_origin: self.source_origin,
            extent: self.extent,
            clip: self.clip,
        }
    }

    /// Compute the execution plan without running it.
    ///
    /// `None` means the request clips to nothing.
    pub fn plan(&self) -> Option<BlitPlan> {
        let source = match &self.source {
            SourceBits::Absent => SourceLayout::Absent,
            SourceBits::Bitmap(bitmap) => SourceLayout::Separate(Layout::of(bitmap)),
            SourceBits::Destination => SourceLayout::Aliased,
        };
        BlitPlan::new(&self.geometry(), Layout::of(&self.dest), source)
    }

    /// Perform the transfer.
    ///
    /// Returns the destination rectangle that was written, or `None` when
    /// clipping left nothing to do. Only the destination is modified, and
    /// only inside that rectangle.
    pub fn copy_bits(mut self) -> Result<Option<Rect>, BitBltError> {
        let Some(plan) = self.plan() else {
            log::debug!("copy_bits: request clipped to nothing: {:?}", self.geometry());
            return Ok(None);
        };
        log::trace!("copy_bits: rule {} plan {:?}", self.rule, plan);

        let source = match &self.source {
            SourceBits::Absent => SourceWords::Absent,
            SourceBits::Bitmap(bitmap) => SourceWords::Separate(bitmap.bytes()),
            SourceBits::Destination => SourceWords::Aliased,
        };
        copy_loop::run(
            &plan,
            self.rule,
            source,
            self.halftone.as_ref(),
            self.dest.bytes_mut(),
        )?;

        Ok(Some(plan.region.dest_rect()))
    }
}
