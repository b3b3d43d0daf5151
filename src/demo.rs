//! Demo scenes
//!
//! Each scene paints a fresh bitmap using nothing but BitBlt requests, so
//! the demo binary doubles as a visual check of the engine.

use std::fmt;
use std::str::FromStr;

use crate::graphics::{
    halftone, BitBlt, Bitmap, CombinationRule, DisplayError, Extent, Point, Rect, Screen,
};

/// Classic Smalltalk arrow cursor, 16x16.
pub const ARROW_CURSOR: [u16; 16] = [
    0x8000, 0xC000, 0xE000, 0xF000, 0xF800, 0xFC00, 0xFE00, 0xF800, 0xF800, 0x9800, 0x0C00,
    0x0C00, 0x0600, 0x0600, 0x0300, 0x0300,
];

/// A demo picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    /// 8x8 checkerboard grown from one tile by in-place doubling copies
    Checkerboard,
    /// Bands of every standard halftone inside a border
    Halftones,
    /// Overlapping in-place copies over a striped background
    Overlap,
    /// Gray desktop with an arrow cursor composited on top
    Cursor,
}

impl Scene {
    pub const ALL: [Scene; 4] = [
        Scene::Checkerboard,
        Scene::Halftones,
        Scene::Overlap,
        Scene::Cursor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scene::Checkerboard => "checkerboard",
            Scene::Halftones => "halftones",
            Scene::Overlap => "overlap",
            Scene::Cursor => "cursor",
        }
    }

    /// Paint the scene into a new bitmap of the given size.
    pub fn render(self, size: Extent) -> Result<Bitmap<Vec<u8>>, DisplayError> {
        let mut screen = Bitmap::zeroed(size.width.max(0) as u32, size.height.max(0) as u32)?;
        log::debug!("rendering scene {} at {}x{}", self, size.width, size.height);
        match self {
            Scene::Checkerboard => checkerboard(&mut screen)?,
            Scene::Halftones => halftones(&mut screen)?,
            Scene::Overlap => overlap(&mut screen)?,
            Scene::Cursor => return cursor(&screen),
        }
        Ok(screen)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scene::ALL
            .into_iter()
            .find(|scene| scene.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown scene '{}'", s))
    }
}

fn checkerboard(screen: &mut Bitmap<Vec<u8>>) -> Result<(), DisplayError> {
    let rows: Vec<u16> = (0..16).map(|y| if y < 8 { 0xFF00 } else { 0x00FF }).collect();
    let tile = Bitmap::from_row_words(&rows)?;
    BitBlt::new(screen).with_source(&tile).copy_bits()?;

    let width = screen.width() as i32;
    let height = screen.height() as i32;

    let mut filled = 16;
    while filled < width {
        BitBlt::new(screen)
            .with_source_from_destination()
            .with_dest_origin(Point::new(filled, 0))
            .with_extent(Extent::new(filled, 16))
            .copy_bits()?;
        filled *= 2;
    }

    let mut filled = 16;
    while filled < height {
        BitBlt::new(screen)
            .with_source_from_destination()
            .with_dest_origin(Point::new(0, filled))
            .with_extent(Extent::new(width, filled))
            .copy_bits()?;
        filled *= 2;
    }
    Ok(())
}

fn halftones(screen: &mut Bitmap<Vec<u8>>) -> Result<(), DisplayError> {
    let patterns: [&[u16]; 6] = [
        &halftone::BLACK,
        &halftone::DARK_GRAY,
        &halftone::GRAY,
        &halftone::LIGHT_GRAY,
        &halftone::VERY_LIGHT_GRAY,
        &halftone::WHITE,
    ];
    let width = screen.width() as i32;
    let height = screen.height() as i32;
    let band = (width / patterns.len() as i32).max(1);

    for (i, rows) in patterns.iter().enumerate() {
        let pattern = Bitmap::halftone(rows)?;
        BitBlt::new(screen)
            .with_halftone(&pattern)
            .with_dest_origin(Point::new(i as i32 * band, 0))
            .with_extent(Extent::new(band, height))
            .copy_bits()?;
    }

    let edges = [
        Rect::from_xywh(0, 0, width, 1),
        Rect::from_xywh(0, height - 1, width, 1),
        Rect::from_xywh(0, 0, 1, height),
        Rect::from_xywh(width - 1, 0, 1, height),
    ];
    for edge in edges {
        BitBlt::new(screen)
            .with_rule(CombinationRule::FILL)
            .with_dest_origin(edge.corner)
            .with_extent(edge.extent)
            .copy_bits()?;
    }
    Ok(())
}

fn overlap(screen: &mut Bitmap<Vec<u8>>) -> Result<(), DisplayError> {
    for y in 0..screen.height() {
        for x in (0..screen.width()).filter(|x| (x + y) % 8 == 0) {
            screen.set(x, y, true)?;
        }
    }

    BitBlt::new(screen)
        .with_dest_origin(Point::new(8, 8))
        .with_extent(Extent::new(24, 24))
        .copy_bits()?;

    // down and to the right, overlapping the block
    BitBlt::new(screen)
        .with_source_from_destination()
        .with_rule(CombinationRule::XOR)
        .with_source_origin(Point::new(8, 8))
        .with_dest_origin(Point::new(13, 11))
        .with_extent(Extent::new(24, 24))
        .copy_bits()?;

    // along the same rows, to the right
    BitBlt::new(screen)
        .with_source_from_destination()
        .with_source_origin(Point::new(8, 8))
        .with_dest_origin(Point::new(43, 8))
        .with_extent(Extent::new(40, 30))
        .copy_bits()?;
    Ok(())
}

fn cursor(desktop: &Bitmap<Vec<u8>>) -> Result<Bitmap<Vec<u8>>, DisplayError> {
    let mut desktop = desktop.to_owned_bitmap();
    let gray = Bitmap::halftone(&halftone::GRAY)?;
    BitBlt::new(&mut desktop).with_halftone(&gray).copy_bits()?;

    let screen = Screen::new();
    screen.set_bitmap(&desktop);
    screen.set_cursor(&Bitmap::from_row_words(&ARROW_CURSOR)?, CombinationRule::XOR);
    screen.move_cursor(Point::new(
        desktop.width() as i32 / 2,
        desktop.height() as i32 / 2,
    ));
    Ok(screen.compose()?.unwrap_or(desktop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::to_ascii;

    #[test]
    fn test_scene_names_round_trip() {
        for scene in Scene::ALL {
            assert_eq!(scene.name().parse::<Scene>().unwrap(), scene);
        }
        assert_eq!("CURSOR".parse::<Scene>().unwrap(), Scene::Cursor);
        assert!("teapot".parse::<Scene>().is_err());
    }

    #[test]
    fn test_checkerboard_tiles_whole_screen() {
        let screen = Scene::Checkerboard.render(Extent::new(40, 20)).unwrap();
        for y in 0..20 {
            for x in 0..40 {
                let expected = ((x / 8) + (y / 8)) % 2 == 0;
                assert_eq!(screen.test(x, y).unwrap(), expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_halftones_border() {
        let screen = Scene::Halftones.render(Extent::new(48, 8)).unwrap();
        let text = to_ascii(&screen);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "#".repeat(48));
        assert_eq!(rows[7], "#".repeat(48));
        assert!(rows[1..7].iter().all(|row| row.starts_with('#') && row.ends_with('#')));
        // first band is solid black, last band white apart from the border
        assert!(rows[3].starts_with("########"));
        assert!(rows[3].ends_with(".......#"));
    }

    #[test]
    fn test_cursor_scene_differs_from_desktop() {
        let screen = Scene::Cursor.render(Extent::new(32, 32)).unwrap();
        // arrow tip lands on the centre pixel and is XORed into the gray
        let gray_row = 0xAAAAu16;
        let desktop_pixel = gray_row >> 15 & 1 == 1;
        assert_eq!(screen.test(16, 16).unwrap(), !desktop_pixel);
    }

    #[test]
    fn test_every_scene_renders() {
        for scene in Scene::ALL {
            let screen = scene.render(Extent::new(96, 64)).unwrap();
            assert_eq!(screen.width(), 96);
            assert_eq!(screen.height(), 64);
        }
        assert!(Scene::Overlap.render(Extent::new(0, 10)).is_err());
    }
}
