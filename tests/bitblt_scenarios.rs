// Fixed BitBlt scenarios and the full combination-rule truth table

use bitblt::graphics::{
    halftone, to_ascii, BitBlt, BitBltError, Bitmap, CombinationRule, Extent, Point, Rect,
};
use rstest::rstest;

fn filled(width: u32, height: u32) -> Bitmap<Vec<u8>> {
    let mut bitmap = Bitmap::zeroed(width, height).unwrap();
    bitmap.fill(true);
    bitmap
}

fn pattern(width: u32, height: u32) -> Bitmap<Vec<u8>> {
    let mut bitmap = Bitmap::zeroed(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            bitmap.set(x, y, (x * 3 + y * 5) % 7 < 3).unwrap();
        }
    }
    bitmap
}

#[test]
fn store_square_into_middle() {
    let mut dest = Bitmap::zeroed(16, 16).unwrap();
    let source = filled(8, 8);

    let touched = BitBlt::new(&mut dest)
        .with_source(&source)
        .with_rule(CombinationRule::STORE)
        .with_dest_origin(Point::new(4, 4))
        .with_extent(Extent::new(8, 8))
        .with_clip(Rect::from_xywh(0, 0, 16, 16))
        .copy_bits()
        .unwrap();

    assert_eq!(touched, Some(Rect::from_xywh(4, 4, 8, 8)));
    for y in 0..16 {
        for x in 0..16 {
            let inside = (4..12).contains(&x) && (4..12).contains(&y);
            assert_eq!(dest.test(x, y).unwrap(), inside, "({}, {})", x, y);
        }
    }
    for y in 4..12 {
        assert_eq!(dest.word_at(y).unwrap(), 0x0FF0);
    }

    insta::assert_snapshot!(to_ascii(&dest), @r"
    ................
    ................
    ................
    ................
    ....########....
    ....########....
    ....########....
    ....########....
    ....########....
    ....########....
    ....########....
    ....########....
    ................
    ................
    ................
    ................
    ");
}

#[test]
fn xor_twice_restores_destination() {
    let mut dest = Bitmap::zeroed(16, 16).unwrap();
    let source = filled(8, 8);

    for _ in 0..2 {
        BitBlt::new(&mut dest)
            .with_source(&source)
            .with_rule(CombinationRule::XOR)
            .with_dest_origin(Point::new(4, 4))
            .with_extent(Extent::new(8, 8))
            .copy_bits()
            .unwrap();
    }
    assert_eq!(dest, Bitmap::zeroed(16, 16).unwrap());
}

#[rstest]
#[case::down_right(Point::new(0, 0), Point::new(2, 2))]
#[case::up_left(Point::new(2, 2), Point::new(0, 0))]
#[case::same_row_right(Point::new(1, 3), Point::new(6, 3))]
#[case::same_row_left(Point::new(9, 5), Point::new(2, 5))]
#[case::down_left(Point::new(7, 1), Point::new(3, 4))]
fn in_place_copy_matches_separate_copy(#[case] from: Point, #[case] to: Point) {
    let original = pattern(16, 16);

    let mut separate = original.clone();
    BitBlt::new(&mut separate)
        .with_source(&original)
        .with_source_origin(from)
        .with_dest_origin(to)
        .with_extent(Extent::new(4, 4))
        .copy_bits()
        .unwrap();

    let mut aliased = original.clone();
    BitBlt::new(&mut aliased)
        .with_source_from_destination()
        .with_source_origin(from)
        .with_dest_origin(to)
        .with_extent(Extent::new(4, 4))
        .copy_bits()
        .unwrap();

    assert_eq!(aliased, separate, "\n{}\n\n{}", to_ascii(&aliased), to_ascii(&separate));
}

#[test]
fn wide_unaligned_in_place_shift() {
    let original = pattern(100, 12);
    let mut separate = original.clone();
    let mut aliased = original.clone();

    BitBlt::new(&mut separate)
        .with_source(&original)
        .with_source_origin(Point::new(3, 2))
        .with_dest_origin(Point::new(21, 2))
        .with_extent(Extent::new(70, 8))
        .copy_bits()
        .unwrap();
    BitBlt::new(&mut aliased)
        .with_source_from_destination()
        .with_source_origin(Point::new(3, 2))
        .with_dest_origin(Point::new(21, 2))
        .with_extent(Extent::new(70, 8))
        .copy_bits()
        .unwrap();

    assert_eq!(aliased, separate);
}

#[rstest]
#[case(CombinationRule::ERASE, "0000")]
#[case(CombinationRule::AND, "0001")]
#[case(CombinationRule::AND_INVERTED_DEST, "0010")]
#[case(CombinationRule::STORE, "0011")]
#[case(CombinationRule::ERASE_SOURCE, "0100")]
#[case(CombinationRule::NO_OP, "0101")]
#[case(CombinationRule::XOR, "0110")]
#[case(CombinationRule::OR, "0111")]
#[case(CombinationRule::NOR, "1000")]
#[case(CombinationRule::XNOR, "1001")]
#[case(CombinationRule::INVERT_DEST, "1010")]
#[case(CombinationRule::OR_INVERTED_DEST, "1011")]
#[case(CombinationRule::INVERT_SOURCE, "1100")]
#[case(CombinationRule::OR_INVERTED_SOURCE, "1101")]
#[case(CombinationRule::NAND, "1110")]
#[case(CombinationRule::FILL, "1111")]
fn rule_truth_table(#[case] rule: CombinationRule, #[case] expected: &str) {
    // outputs for (source, dest) = (0,0) (0,1) (1,0) (1,1)
    let inputs = [(false, false), (false, true), (true, false), (true, true)];

    let mut source = Bitmap::zeroed(4, 1).unwrap();
    let mut dest = Bitmap::zeroed(4, 1).unwrap();
    for (x, (s, d)) in inputs.iter().enumerate() {
        source.set(x as u32, 0, *s).unwrap();
        dest.set(x as u32, 0, *d).unwrap();
    }

    BitBlt::new(&mut dest)
        .with_source(&source)
        .with_rule(rule)
        .copy_bits()
        .unwrap();

    let actual: String = (0..4)
        .map(|x| if dest.test(x, 0).unwrap() { '1' } else { '0' })
        .collect();
    assert_eq!(actual, expected, "rule {}", rule);
}

#[rstest]
#[case(-1)]
#[case(16)]
#[case(255)]
fn out_of_range_rule_codes_are_rejected(#[case] code: i32) {
    assert_eq!(
        CombinationRule::new(code),
        Err(BitBltError::InvalidRule(code))
    );
}

#[test]
fn clip_rectangle_limits_writes() {
    let mut dest = Bitmap::zeroed(32, 8).unwrap();
    let touched = BitBlt::new(&mut dest)
        .with_rule(CombinationRule::FILL)
        .with_dest_origin(Point::new(-5, -5))
        .with_extent(Extent::new(100, 100))
        .with_clip(Rect::from_xywh(3, 2, 20, 3))
        .copy_bits()
        .unwrap();

    assert_eq!(touched, Some(Rect::from_xywh(3, 2, 20, 3)));
    for y in 0..8 {
        for x in 0..32 {
            let inside = (3..23).contains(&x) && (2..5).contains(&y);
            assert_eq!(dest.test(x, y).unwrap(), inside);
        }
    }
}

#[rstest]
#[case::zero_width(Point::new(0, 0), Extent::new(0, 5))]
#[case::negative_height(Point::new(0, 0), Extent::new(4, -3))]
#[case::off_right(Point::new(40, 0), Extent::new(4, 4))]
#[case::off_top(Point::new(0, -10), Extent::new(4, 4))]
fn empty_requests_leave_destination_alone(#[case] origin: Point, #[case] extent: Extent) {
    let before = pattern(32, 8);
    let mut dest = before.clone();
    let touched = BitBlt::new(&mut dest)
        .with_rule(CombinationRule::FILL)
        .with_dest_origin(origin)
        .with_extent(extent)
        .copy_bits()
        .unwrap();
    assert_eq!(touched, None);
    assert_eq!(dest, before);
}

#[test]
fn halftone_fill_follows_destination_rows() {
    let mut dest = Bitmap::zeroed(20, 4).unwrap();
    let gray = Bitmap::halftone(&halftone::GRAY).unwrap();
    BitBlt::new(&mut dest)
        .with_halftone(&gray)
        .with_dest_origin(Point::new(0, 1))
        .with_extent(Extent::new(20, 2))
        .copy_bits()
        .unwrap();

    insta::assert_snapshot!(to_ascii(&dest), @r"
    ....................
    .#.#.#.#.#.#.#.#.#.#
    #.#.#.#.#.#.#.#.#.#.
    ....................
    ");
}

#[test]
fn source_and_halftone_are_anded() {
    let mut dest = Bitmap::zeroed(16, 2).unwrap();
    let source = filled(16, 2);
    let stripes = Bitmap::halftone(&[0xF0F0]).unwrap();
    BitBlt::new(&mut dest)
        .with_source(&source)
        .with_halftone(&stripes)
        .copy_bits()
        .unwrap();
    assert_eq!(dest.word_at(0).unwrap(), 0xF0F0);
    assert_eq!(dest.word_at(1).unwrap(), 0xF0F0);
}
