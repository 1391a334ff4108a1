macro_rules! bit {
    ($bit_num:expr) => {
        1 << $bit_num
    };
}

macro_rules! bits {
    [ $($bit_num:expr),* ] => {
        $(bit!($bit_num))|*
    };
}

macro_rules! test_bit {
    ($val:expr, $bit_num:expr) => {
        (($val) & (1 << $bit_num)) != 0
    };
}

pub(crate) use {bit, bits, test_bit};

/// Coordinates are 11 bits wide on the wire.
/// Out-of-range values wrap, they are never clamped.
pub const COORD_MASK: u32 = 0x7FF;

/// Pack a screen coordinate pair into a vertex word.
#[inline]
pub const fn pack_coord(x: i16, y: i16) -> u32 {
    (((y as u32) & COORD_MASK) << 16) | ((x as u32) & COORD_MASK)
}

/// Pack an RGB triple into the low 24 bits of a command word.
#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((b as u32) << 16) | ((g as u32) << 8) | (r as u32)
}

/// Pack a width and height into a size word.
#[inline]
pub const fn pack_size(w: u16, h: u16) -> u32 {
    ((h as u32) << 16) | (w as u32)
}

/// Pack a texel coordinate into the low halfword of a UV word.
#[inline]
pub const fn pack_uv(u: u8, v: u8) -> u32 {
    ((v as u32) << 8) | (u as u32)
}

/// CLUT identifier for a palette stored at (x, y) in VRAM.
///
/// X is in units of 16 halfwords.
#[inline]
pub const fn clut_id(x: u16, y: u16) -> u32 {
    (((x as u32) & 0x3FF) >> 4) | (((y as u32) & 0x1FF) << 6)
}

/// Texture page identifier for a texture stored at (x, y) in VRAM.
#[inline]
pub const fn texture_page(x: u16, y: u16) -> u8 {
    ((x / 64) + ((y / 256) * 16)) as u8
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coords_wrap_to_11_bits() {
        assert_eq!(pack_coord(2048, 0), 0);
        assert_eq!(pack_coord(0, 2049), 0x0001_0000);
        assert_eq!(pack_coord(-1, -1), 0x07FF_07FF);
        assert_eq!(pack_coord(10, 20), 0x0014_000A);
    }

    #[test]
    fn clut_and_page() {
        assert_eq!(clut_id(0, 0), 0);
        assert_eq!(clut_id(320, 480), (320 >> 4) | (480 << 6));
        // x above 1023 wraps before the shift.
        assert_eq!(clut_id(1024 + 32, 0), 2);
        assert_eq!(texture_page(320, 256), 5 + 16);
    }

    #[test]
    fn test_bit_macro() {
        assert!(test_bit!(0x0400_0000u32, 26));
        assert!(!test_bit!(0x0400_0000u32, 28));
    }
}
