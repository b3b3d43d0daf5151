//! BitBlt copy phase
//!
//! Walks the rows and words named by a [`BlitPlan`], pulling source words
//! through a two-word shifter, ANDing them with the halftone word for the
//! row, merging them into the destination with the combination rule and
//! writing back only the bits selected by the edge mask.

use crate::graphics::bitmap::{read_word, Bitmap, BitmapError};

use super::plan::{BlitPlan, Direction, ALL_ONES};
use super::rule::CombinationRule;
use super::BitBltError;

/// Source word supply for the shifter.
#[derive(Debug, Clone, Copy)]
pub(super) enum SourceWords<'a> {
    Absent,
    Separate(&'a [u8]),
    Aliased,
}

impl SourceWords<'_> {
    /// Word `index` of the source.
    ///
    /// The shifter may run one word past either end of the source span;
    /// such words only ever reach masked-off destination bits, so when they
    /// fall outside the buffer they read as zero.
    #[inline]
    fn fetch(&self, dest: &[u8], index: isize) -> u16 {
        let bytes = match *self {
            SourceWords::Absent => return ALL_ONES,
            SourceWords::Separate(bytes) => bytes,
            SourceWords::Aliased => dest,
        };
        usize::try_from(index)
            .ok()
            .and_then(|index| read_word(bytes, index))
            .unwrap_or(0)
    }
}

/// Halftone word for destination row `row`.
fn halftone_word(halftone: Option<&Bitmap<&[u8]>>, row: i32) -> Result<u16, BitmapError> {
    match halftone {
        Some(pattern) => {
            let row = row.rem_euclid(pattern.height() as i32) as usize;
            pattern.word_at(row * pattern.raster())
        }
        None => Ok(ALL_ONES),
    }
}

/// Check that a row's destination words all lie inside the buffer.
fn check_row(first: isize, last: isize, len: usize) -> Result<(), BitmapError> {
    let in_range = |index: isize| usize::try_from(index).is_ok_and(|index| index < len);
    if in_range(first) && in_range(last) {
        Ok(())
    } else {
        Err(BitmapError::WordIndexOutOfRange {
            index: first.max(last).max(0) as usize,
            len,
        })
    }
}

/// Execute `plan` against the destination bytes.
///
/// `dest` must be exactly the destination's `word_len * 2` bytes.
pub(super) fn run(
    plan: &BlitPlan,
    rule: CombinationRule,
    source: SourceWords<'_>,
    halftone: Option<&Bitmap<&[u8]>>,
    dest: &mut [u8],
) -> Result<(), BitBltError> {
    let masks = plan.masks;
    let h_step = plan.h_dir.step();
    let v_step = plan.v_dir.step() as i32;
    let dest_len = dest.len() / 2;
    let row_span = (masks.n_words as isize - 1) * h_step;

    let mut source_index = plan.source_index;
    let mut dest_index = plan.dest_index;
    let mut row = plan.first_dest_row;

    for _ in 0..plan.region.h {
        let halftone_word = halftone_word(halftone, row)?;
        row += v_step;
        check_row(dest_index, dest_index + row_span, dest_len)?;

        let mut prev_word = if plan.preload {
            let word = source.fetch(dest, source_index);
            source_index += h_step;
            word
        } else {
            0
        };

        let mut merge_mask = masks.mask1;
        for word in 0..masks.n_words {
            let skew_word = if plan.has_source {
                let this_word = source.fetch(dest, source_index);
                // Left-hand word contributes its low bits, right-hand word its high bits.
                let (left, right) = match plan.h_dir {
                    Direction::Forward => (prev_word, this_word),
                    Direction::Backward => (this_word, prev_word),
                };
                prev_word = this_word;
                ((left & masks.skew_mask) | (right & !masks.skew_mask)).rotate_left(masks.skew)
            } else {
                ALL_ONES
            };

            let at = dest_index as usize * 2;
            let dest_word = u16::from_be_bytes([dest[at], dest[at + 1]]);
            let merge_word = rule.merge(skew_word & halftone_word, dest_word);
            let result = (merge_mask & merge_word) | (!merge_mask & dest_word);
            dest[at..at + 2].copy_from_slice(&result.to_be_bytes());

            source_index += h_step;
            dest_index += h_step;
            merge_mask = if word + 2 == masks.n_words {
                masks.mask2
            } else {
                ALL_ONES
            };
        }

        source_index += plan.source_delta;
        dest_index += plan.dest_delta;
    }

    Ok(())
}
