//! BitBlt setup phase
//!
//! Everything the copy loop needs is computed up front, in four steps, into
//! an immutable [`BlitPlan`]:
//!
//! 1. [`clip_range`]: intersect the request with the clip rectangle, the
//!    destination bounds and the source bounds
//! 2. [`compute_masks`]: skew and edge masks for the first/last word of a row
//! 3. [`select_directions`]: traversal order that keeps an in-place copy
//!    from reading words it has already overwritten
//! 4. offsets: starting word indices and per-row deltas
//!
//! The plan depends only on geometry, bitmap sizes and whether the source
//! aliases the destination, so it can be computed and inspected without
//! touching any pixels.

use std::cmp::Ordering;

use crate::graphics::bitmap::{Bitmap, PIXELS_PER_WORD};
use crate::graphics::geometry::{Extent, Point, Rect};

/// Word with every bit set.
pub const ALL_ONES: u16 = 0xFFFF;

/// `RIGHT_MASKS[n]` has the `n` rightmost bits set.
const RIGHT_MASKS: [u16; 17] = [
    0x0000, 0x0001, 0x0003, 0x0007, 0x000F, 0x001F, 0x003F, 0x007F, 0x00FF, 0x01FF, 0x03FF,
    0x07FF, 0x0FFF, 0x1FFF, 0x3FFF, 0x7FFF, 0xFFFF,
];

/// Requested geometry, before any clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitGeometry {
    pub dest_origin: Point,
    pub source_origin: Point,
    pub extent: Extent,
    pub clip: Rect,
}

/// Size and stride of a bitmap taking part in a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub extent: Extent,
    /// Words per row
    pub raster: usize,
}

impl Layout {
    pub fn of<B: AsRef<[u8]>>(bitmap: &Bitmap<B>) -> Self {
        Self {
            extent: Extent::new(bitmap.width() as i32, bitmap.height() as i32),
            raster: bitmap.raster(),
        }
    }
}

/// Where source words come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// No source; every source word reads as all ones.
    Absent,
    /// A bitmap with its own buffer.
    Separate(Layout),
    /// The destination bitmap itself.
    Aliased,
}

/// The request after clipping: a source and destination rectangle of the
/// same size, both fully inside their bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRegion {
    pub sx: i32,
    pub sy: i32,
    pub dx: i32,
    pub dy: i32,
    pub w: i32,
    pub h: i32,
}

impl ClippedRegion {
    pub fn dest_rect(&self) -> Rect {
        Rect::from_xywh(self.dx, self.dy, self.w, self.h)
    }

    pub fn source_rect(&self) -> Rect {
        Rect::from_xywh(self.sx, self.sy, self.w, self.h)
    }
}

/// Clip the requested rectangle.
///
/// The destination rectangle is cut down to the clip rectangle (itself cut
/// down to the destination bounds), and then to whatever the source can
/// supply. Every cut on one side moves the other side's origin by the same
/// amount. Returns `None` when nothing is left.
pub fn clip_range(
    geometry: &BlitGeometry,
    dest: Extent,
    source: Option<Extent>,
) -> Option<ClippedRegion> {
    let clip = geometry
        .clip
        .intersection(&Rect::new(Point::origin(), dest))?;

    let mut dx = geometry.dest_origin.x as i64;
    let mut dy = geometry.dest_origin.y as i64;
    // without a source the source origin means nothing; track the destination
    let (mut sx, mut sy) = match source {
        Some(_) => (
            geometry.source_origin.x as i64,
            geometry.source_origin.y as i64,
        ),
        None => (dx, dy),
    };
    let mut w = geometry.extent.width as i64;
    let mut h = geometry.extent.height as i64;

    // first in x
    let clip_x = clip.x() as i64;
    if dx < clip_x {
        sx += clip_x - dx;
        w -= clip_x - dx;
        dx = clip_x;
    }
    if dx + w > clip.right() {
        w = clip.right() - dx;
    }

    // then in y
    let clip_y = clip.y() as i64;
    if dy < clip_y {
        sy += clip_y - dy;
        h -= clip_y - dy;
        dy = clip_y;
    }
    if dy + h > clip.bottom() {
        h = clip.bottom() - dy;
    }

    if let Some(source) = source {
        if sx < 0 {
            dx -= sx;
            w += sx;
            sx = 0;
        }
        if sx + w > source.width as i64 {
            w = source.width as i64 - sx;
        }
        if sy < 0 {
            dy -= sy;
            h += sy;
            sy = 0;
        }
        if sy + h > source.height as i64 {
            h = source.height as i64 - sy;
        }
    }

    if w <= 0 || h <= 0 {
        return None;
    }

    Some(ClippedRegion {
        sx: i32::try_from(sx).ok()?,
        sy: i32::try_from(sy).ok()?,
        dx: i32::try_from(dx).ok()?,
        dy: i32::try_from(dy).ok()?,
        w: i32::try_from(w).ok()?,
        h: i32::try_from(h).ok()?,
    })
}

/// Skew and edge masks for a clipped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeMasks {
    /// Left rotation that lines source bits up with destination words
    pub skew: u32,
    /// Bits of the first destination word of a row that get written
    pub mask1: u16,
    /// Bits of the last destination word of a row that get written
    pub mask2: u16,
    /// Bits of the shifter taken from the left-hand source word
    pub skew_mask: u16,
    /// Destination words touched per row
    pub n_words: usize,
}

/// Compute the masks for a left-to-right traversal of `region`.
pub fn compute_masks(region: &ClippedRegion) -> EdgeMasks {
    let word = PIXELS_PER_WORD as i32;
    let skew = (region.sx as i64 - region.dx as i64).rem_euclid(word as i64) as u32;

    let start_bits = word - (region.dx & 15);
    let mut mask1 = RIGHT_MASKS[start_bits as usize];
    let end_bits = 15 - ((region.dx + region.w - 1) & 15);
    let mut mask2 = !RIGHT_MASKS[end_bits as usize];
    let skew_mask = if skew == 0 {
        0
    } else {
        RIGHT_MASKS[(PIXELS_PER_WORD - skew) as usize]
    };

    let n_words = if region.w < start_bits {
        mask1 &= mask2;
        mask2 = 0;
        1
    } else {
        ((region.w - start_bits - 1).div_euclid(word) + 2) as usize
    };

    EdgeMasks {
        skew,
        mask1,
        mask2,
        skew_mask,
        n_words,
    }
}

/// Traversal order along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right, or top to bottom
    Forward,
    /// Right to left, or bottom to top
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Pick `(vertical, horizontal)` traversal directions.
///
/// Only an aliased source can be overwritten before it is read, and only
/// when the destination lies below it, or on the same rows and to its
/// right. Those cases start from the far end instead.
///
/// | same buffer | dy vs sy | dx vs sx | vertical | horizontal |
/// |-------------|----------|----------|----------|------------|
/// | yes         | >        | any      | Backward | Forward    |
/// | yes         | =        | >        | Forward  | Backward   |
/// | yes         | =        | <=       | Forward  | Forward    |
/// | yes         | <        | any      | Forward  | Forward    |
/// | no          | any      | any      | Forward  | Forward    |
pub fn select_directions(same_buffer: bool, region: &ClippedRegion) -> (Direction, Direction) {
    match (
        same_buffer,
        region.dy.cmp(&region.sy),
        region.dx.cmp(&region.sx),
    ) {
        (true, Ordering::Greater, _) => (Direction::Backward, Direction::Forward),
        (true, Ordering::Equal, Ordering::Greater) => (Direction::Forward, Direction::Backward),
        _ => (Direction::Forward, Direction::Forward),
    }
}

/// Fully computed BitBlt execution plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitPlan {
    /// Clipped rectangles, in normal (top-left) orientation
    pub region: ClippedRegion,
    /// Masks in traversal order (first word processed uses `mask1`)
    pub masks: EdgeMasks,
    pub v_dir: Direction,
    pub h_dir: Direction,
    /// Whether a source is read at all
    pub has_source: bool,
    /// Fetch one extra source word before the first merge of each row
    pub preload: bool,
    /// Destination row processed first; selects the first halftone row
    pub first_dest_row: i32,
    pub source_index: isize,
    pub dest_index: isize,
    /// Added to the source index at the end of each row
    pub source_delta: isize,
    /// Added to the destination index at the end of each row
    pub dest_delta: isize,
}

impl BlitPlan {
    /// Run the setup steps. `None` means the blit is a no-op.
    pub fn new(geometry: &BlitGeometry, dest: Layout, source: SourceLayout) -> Option<Self> {
        let source_layout = match source {
            SourceLayout::Absent => None,
            SourceLayout::Separate(layout) => Some(layout),
            SourceLayout::Aliased => Some(dest),
        };

        let region = clip_range(geometry, dest.extent, source_layout.map(|l| l.extent))?;
        let mut masks = compute_masks(&region);
        let (v_dir, h_dir) = select_directions(source == SourceLayout::Aliased, &region);

        let ClippedRegion {
            mut sx,
            mut sy,
            mut dx,
            mut dy,
            w,
            h,
        } = region;
        if v_dir == Direction::Backward {
            sy += h - 1;
            dy += h - 1;
        }
        if h_dir == Direction::Backward {
            sx += w - 1;
            dx += w - 1;
            if masks.n_words > 1 {
                std::mem::swap(&mut masks.mask1, &mut masks.mask2);
            }
        }

        let has_source = source_layout.is_some();
        let mut preload = has_source && masks.skew != 0 && masks.skew <= (sx & 15) as u32;
        if h_dir == Direction::Backward {
            preload = !preload;
        }

        let source_raster = source_layout.map_or(0, |l| l.raster) as isize;
        let dest_raster = dest.raster as isize;
        let v_step = v_dir.step();
        let h_step = h_dir.step();
        let n_words = masks.n_words as isize;

        Some(Self {
            region,
            masks,
            v_dir,
            h_dir,
            has_source,
            preload,
            first_dest_row: dy,
            source_index: sy as isize * source_raster + (sx >> 4) as isize,
            dest_index: dy as isize * dest_raster + (dx >> 4) as isize,
            source_delta: source_raster * v_step - (n_words + preload as isize) * h_step,
            dest_delta: dest_raster * v_step - n_words * h_step,
        })
    }
}
