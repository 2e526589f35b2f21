//! Property tests for the hex color codec.

use pixel_core::{color_to_packed, PackedColor, Rgb};
use proptest::prelude::*;

proptest! {
    #[test]
    fn six_digit_keeps_top_bits(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let packed = color_to_packed(Some(&format!("#{r:02X}{g:02X}{b:02X}")));
        prop_assert_eq!(packed.red5(), r >> 3);
        prop_assert_eq!(packed.green6(), g >> 2);
        prop_assert_eq!(packed.blue5(), b >> 3);
    }

    #[test]
    fn lowercase_matches_uppercase(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let upper = color_to_packed(Some(&format!("#{r:02X}{g:02X}{b:02X}")));
        let lower = color_to_packed(Some(&format!("#{r:02x}{g:02x}{b:02x}")));
        prop_assert_eq!(upper, lower);
    }

    #[test]
    fn three_digit_equals_doubled_six_digit(r in 0u8..16, g in 0u8..16, b in 0u8..16) {
        let short = color_to_packed(Some(&format!("#{r:X}{g:X}{b:X}")));
        let long = color_to_packed(Some(&format!("#{r:X}{r:X}{g:X}{g:X}{b:X}{b:X}")));
        prop_assert_eq!(short, long);
    }

    #[test]
    fn unmarked_strings_are_black(s in "[^#].*") {
        prop_assert_eq!(color_to_packed(Some(&s)), PackedColor::BLACK);
    }

    #[test]
    fn other_lengths_are_black(digits in "[0-9A-Fa-f]{0,12}") {
        prop_assume!(digits.len() != 3 && digits.len() != 6);
        prop_assert_eq!(color_to_packed(Some(&format!("#{digits}"))), PackedColor::BLACK);
    }

    #[test]
    fn packing_matches_from_rgb(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let packed = PackedColor::from(Rgb::new(r, g, b));
        let expected = (u16::from(r & 0xF8) << 8) | (u16::from(g & 0xFC) << 3) | u16::from(b >> 3);
        prop_assert_eq!(packed.raw(), expected);
    }
}

#[test]
fn absent_color_is_black() {
    assert_eq!(color_to_packed(None), PackedColor::BLACK);
    assert_eq!(color_to_packed(Some("")), PackedColor::BLACK);
}
