//! Attribute resolution: merges the persistent draw mode with a
//! primitive's own attribute flags.

use crate::{
    env::DrawMode,
    utils::bits::*
};

bitflags::bitflags! {
    /// Per-primitive attribute flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attribute: u32 {
        const ColorMode  = bits![0, 1];
        const TransMode  = bits![2, 3];
        /// Enable semi-transparency on the primitive itself.
        const SemiTrans  = bit!(4);
        const HFlip      = bit!(5);
        const VFlip      = bit!(6);
        /// Carried for callers; masking is configured through the draw environment.
        const IgnoreMask = bit!(7);
    }
}

/// Texture color depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Clut4   = 0,
    Clut8   = 1,
    Direct15 = 2,
    Direct24 = 3,
}

/// How a semi-transparent pixel combines with the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransMode {
    /// B/2 + F/2
    Half     = 0,
    /// B + F
    Add      = 1,
    /// B - F
    Subtract = 2,
    /// B + F/4
    Quarter  = 3,
}

impl Attribute {
    pub const fn color(mode: ColorMode) -> Self {
        Self::from_bits_retain(mode as u32)
    }

    pub const fn trans(mode: TransMode) -> Self {
        Self::from_bits_retain((mode as u32) << 2)
    }

    pub fn color_mode_bits(self) -> u32 {
        self.bits() & 3
    }

    pub fn trans_mode_bits(self) -> u32 {
        (self.bits() >> 2) & 3
    }
}

/// Result of resolving a primitive's attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Draw mode word. The top byte is the stored E1 opcode (if any),
    /// the low 16 bits are the texpage attribute.
    pub mode: u32,
    /// Bits to OR into the primitive's opcode byte.
    pub opcode_bits: u8,
}

impl Resolved {
    /// Opcode byte for `base` with the semi-transparency adjustment applied.
    #[inline]
    pub fn opcode(&self, base: u8) -> u8 {
        base | self.opcode_bits
    }

    /// Low halfword of the mode word, as carried in a textured UV word.
    #[inline]
    pub fn texpage(&self) -> u32 {
        self.mode & 0xFFFF
    }
}

/// Merge the draw mode with a primitive's texture page and attributes.
///
/// Pure: the same inputs always give the same result.
pub fn resolve(tpage: u8, attribute: Attribute, mode: &DrawMode) -> Resolved {
    let mode_word = mode.packet()
        | (tpage as u32 & 0x1F)
        | (attribute.color_mode_bits() << 7)
        | (attribute.trans_mode_bits() << 5);
    let opcode_bits = if attribute.contains(Attribute::SemiTrans) { 2 } else { 0 };
    Resolved {
        mode: mode_word,
        opcode_bits,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::DrawEnv;
    use proptest::prelude::*;

    #[test]
    fn default_mode_word() {
        let mode = DrawMode::new();
        let res = resolve(5, Attribute::color(ColorMode::Direct15), &mode);
        assert_eq!(res.mode, 5 | (2 << 7));
        assert_eq!(res.opcode(0x2C), 0x2C);
    }

    #[test]
    fn semi_trans_sets_opcode_bit() {
        let mode = DrawMode::new();
        let attr = Attribute::SemiTrans | Attribute::trans(TransMode::Subtract);
        let res = resolve(0, attr, &mode);
        assert_eq!(res.opcode(0x64), 0x66);
        assert_eq!(res.mode, 2 << 5);
    }

    #[test]
    fn merges_stored_packet() {
        let mut mode = DrawMode::new();
        mode.apply_draw_env(&DrawEnv {
            dither: true,
            draw_on_display: true,
            ..DrawEnv::new(0, 0, 320, 240)
        });
        let res = resolve(1, Attribute::empty(), &mode);
        assert_eq!(res.mode, 0xE100_0601);
        assert_eq!(res.texpage(), 0x0601);
    }

    proptest! {
        #[test]
        fn low_bits_are_texture_page(tpage: u8, attr: u32, dither: bool, on_display: bool) {
            let mut mode = DrawMode::new();
            mode.apply_draw_env(&DrawEnv {
                dither,
                draw_on_display: on_display,
                ..DrawEnv::new(0, 0, 256, 240)
            });
            let attr = Attribute::from_bits_retain(attr);
            let res = resolve(tpage, attr, &mode);
            prop_assert_eq!(res.mode & 0x1F, tpage as u32 & 0x1F);
            prop_assert_eq!(res, resolve(tpage, attr, &mode));
            prop_assert_eq!((res.mode >> 7) & 3, attr.bits() & 3);
            prop_assert_eq!((res.mode >> 5) & 3, (attr.bits() >> 2) & 3);
        }
    }
}
