//! Primitive descriptors.
//!
//! Coordinates are signed screen positions. Anything outside the 11-bit
//! range wraps when encoded, matching the hardware.

use crate::{
    attrib::Attribute,
    env::{DispEnv, DrawEnv},
    utils::bits::*
};

/// Mid-grey: texels are drawn unmodulated.
pub const NORMAL_LUMINANCE: u8 = 128;

/// Fixed-point 1.0 for sprite scale factors.
pub const SCALE_ONE: i32 = 4096;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vertex {
    pub x: i16,
    pub y: i16,
}

impl Vertex {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn word(self) -> u32 {
        pack_coord(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const NORMAL: Color = Color::grey(NORMAL_LUMINANCE);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(l: u8) -> Self {
        Self { r: l, g: l, b: l }
    }

    #[inline]
    pub const fn word(self) -> u32 {
        pack_rgb(self.r, self.g, self.b)
    }

    /// Color word with an opcode in the top byte.
    #[inline]
    pub const fn command(self, opcode: u8) -> u32 {
        ((opcode as u32) << 24) | self.word()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TexCoord {
    pub u: u8,
    pub v: u8,
}

impl TexCoord {
    pub const fn new(u: u8, v: u8) -> Self {
        Self { u, v }
    }

    #[inline]
    pub const fn word(self) -> u32 {
        pack_uv(self.u, self.v)
    }
}

/// VRAM position of a color lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClutPos {
    pub x: u16,
    pub y: u16,
}

impl ClutPos {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn id(self) -> u32 {
        clut_id(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Poly3 {
    pub points: [Vertex; 3],
    pub color: Color,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Poly4 {
    pub points: [Vertex; 4],
    pub color: Color,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GPoly3 {
    pub points: [Vertex; 3],
    pub colors: [Color; 3],
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GPoly4 {
    pub points: [Vertex; 4],
    pub colors: [Color; 4],
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TPoly3 {
    pub points: [Vertex; 3],
    pub uv: [TexCoord; 3],
    pub color: Color,
    pub tpage: u8,
    pub clut: ClutPos,
    pub attribute: Attribute,
}

/// Textured quad. Vertex order is top-left, bottom-left, top-right, bottom-right.
#[derive(Clone, Copy, Debug, Default)]
pub struct TPoly4 {
    pub points: [Vertex; 4],
    pub uv: [TexCoord; 4],
    pub color: Color,
    pub tpage: u8,
    pub clut: ClutPos,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GTPoly3 {
    pub points: [Vertex; 3],
    pub uv: [TexCoord; 3],
    pub colors: [Color; 3],
    pub tpage: u8,
    pub clut: ClutPos,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GTPoly4 {
    pub points: [Vertex; 4],
    pub uv: [TexCoord; 4],
    pub colors: [Color; 4],
    pub tpage: u8,
    pub clut: ClutPos,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Line {
    pub points: [Vertex; 2],
    pub color: Color,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GLine {
    pub points: [Vertex; 2],
    pub colors: [Color; 2],
    pub attribute: Attribute,
}

/// Open-ended flat-shaded line strip.
#[derive(Clone, Copy, Debug)]
pub struct PolyLine<'p> {
    pub points: &'p [Vertex],
    pub color: Color,
    pub attribute: Attribute,
}

/// Open-ended gouraud-shaded line strip. `colors` must cover every point.
#[derive(Clone, Copy, Debug)]
pub struct GPolyLine<'p> {
    pub points: &'p [Vertex],
    pub colors: &'p [Color],
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Dot {
    pub point: Vertex,
    pub color: Color,
    pub attribute: Attribute,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Rectangle {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub color: Color,
    pub attribute: Attribute,
}

/// A textured rectangle that may be flipped, scaled or rotated.
///
/// Scale factors: 0, 1 and -1 mean unscaled. 2..=8 multiply, -2 and below
/// divide, and anything above 8 is fixed point with `SCALE_ONE` as 1.0.
/// `rotate` is in degrees, fixed point with 12 fractional bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sprite {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub u: u8,
    pub v: u8,
    pub color: Color,
    pub tpage: u8,
    pub clut: ClutPos,
    pub attribute: Attribute,
    pub scale_x: i32,
    pub scale_y: i32,
    /// Rotation pivot, relative to (x, y).
    pub pivot_x: i16,
    pub pivot_y: i16,
    pub rotate: i32,
}

impl Sprite {
    /// An unscaled, unrotated sprite of `w` by `h` texels at (u, v) in `tpage`.
    ///
    /// The pivot defaults to the centre.
    pub fn new(x: i16, y: i16, w: u16, h: u16, tpage: u8, u: u8, v: u8) -> Self {
        Self {
            x, y, w, h, u, v, tpage,
            color: Color::NORMAL,
            pivot_x: (w >> 1) as i16,
            pivot_y: (h >> 1) as i16,
            ..Default::default()
        }
    }
}

/// Anything that can be placed in an ordering table.
#[derive(Clone, Copy, Debug)]
pub enum Primitive<'p> {
    Poly3(Poly3),
    Poly4(Poly4),
    GPoly3(GPoly3),
    GPoly4(GPoly4),
    TPoly3(TPoly3),
    TPoly4(TPoly4),
    GTPoly3(GTPoly3),
    GTPoly4(GTPoly4),
    Line(Line),
    GLine(GLine),
    PolyLine(PolyLine<'p>),
    GPolyLine(GPolyLine<'p>),
    Dot(Dot),
    Sprite(Sprite),
    Rectangle(Rectangle),
    DrawEnv(DrawEnv),
    DispEnv(DispEnv),
}
