//! Primitive packet encoders.
//!
//! Each encoder resolves the primitive's attributes against the draw mode,
//! lays out the hardware packet and appends it to the ordering table as one
//! entry. Packet layouts are fixed by the coprocessor's command set.

mod sprite;

pub use sprite::{scale_edge, scaled_size, sort_simple_sprite, sort_sprite, sprite_path, SpritePath};

use crate::{
    attrib::resolve,
    env::{self, DrawMode},
    error::{GsError, Result},
    ot::OrderingTable,
    prim::*
};

pub mod opcode {
    pub const POLY3: u8     = 0x20;
    pub const TPOLY3: u8    = 0x24;
    pub const POLY4: u8     = 0x28;
    pub const TPOLY4: u8    = 0x2C;
    pub const GPOLY3: u8    = 0x30;
    pub const GTPOLY3: u8   = 0x34;
    pub const GPOLY4: u8    = 0x38;
    pub const GTPOLY4: u8   = 0x3C;
    pub const LINE: u8      = 0x40;
    pub const POLYLINE: u8  = 0x48;
    pub const GLINE: u8     = 0x50;
    pub const GPOLYLINE: u8 = 0x58;
    pub const RECT: u8      = 0x60;
    pub const SPRITE: u8    = 0x64;
    pub const DOT: u8       = 0x68;
}

/// Ends a poly-line.
pub const POLYLINE_END: u32 = 0x5555_5555;

/// Whether the coprocessor takes `word` as the end of a poly-line.
#[inline]
pub const fn ends_polyline(word: u32) -> bool {
    word & 0xF000_F000 == 0x5000_5000
}

/// Whether `cmd` starts a poly-line, flat or gouraud, with any attribute bits.
#[inline]
pub const fn starts_polyline(cmd: u32) -> bool {
    (cmd >> 24) as u8 & 0xE8 == opcode::POLYLINE
}

/// Append any primitive.
pub fn sort(list: &mut OrderingTable, mode: &mut DrawMode, prim: &Primitive) -> Result<()> {
    match prim {
        Primitive::Poly3(p)     => sort_poly3(list, mode, p),
        Primitive::Poly4(p)     => sort_poly4(list, mode, p),
        Primitive::GPoly3(p)    => sort_gpoly3(list, mode, p),
        Primitive::GPoly4(p)    => sort_gpoly4(list, mode, p),
        Primitive::TPoly3(p)    => sort_tpoly3(list, mode, p),
        Primitive::TPoly4(p)    => sort_tpoly4(list, mode, p),
        Primitive::GTPoly3(p)   => sort_gtpoly3(list, mode, p),
        Primitive::GTPoly4(p)   => sort_gtpoly4(list, mode, p),
        Primitive::Line(l)      => sort_line(list, mode, l),
        Primitive::GLine(l)     => sort_gline(list, mode, l),
        Primitive::PolyLine(l)  => sort_polyline(list, mode, l),
        Primitive::GPolyLine(l) => sort_gpolyline(list, mode, l),
        Primitive::Dot(d)       => sort_dot(list, mode, d),
        Primitive::Sprite(s)    => sort_sprite(list, mode, s),
        Primitive::Rectangle(r) => sort_rectangle(list, mode, r),
        Primitive::DrawEnv(e)   => env::queue_draw_env(list, mode, e),
        Primitive::DispEnv(e)   => env::queue_disp_env(list, e),
    }
}

pub fn sort_poly3(list: &mut OrderingTable, mode: &DrawMode, poly: &Poly3) -> Result<()> {
    let res = resolve(0, poly.attribute, mode);
    let [v0, v1, v2] = poly.points;
    list.append(&[
        res.mode,
        poly.color.command(res.opcode(opcode::POLY3)),
        v0.word(),
        v1.word(),
        v2.word(),
    ])?;
    Ok(())
}

pub fn sort_poly4(list: &mut OrderingTable, mode: &DrawMode, poly: &Poly4) -> Result<()> {
    let res = resolve(0, poly.attribute, mode);
    let [v0, v1, v2, v3] = poly.points;
    list.append(&[
        res.mode,
        poly.color.command(res.opcode(opcode::POLY4)),
        v0.word(),
        v1.word(),
        v2.word(),
        v3.word(),
    ])?;
    Ok(())
}

/// Gouraud vertices: the opcode rides on the first color only.
fn gouraud<const N: usize, const W: usize>(op: u8, mode_word: u32, points: &[Vertex; N], colors: &[Color; N]) -> [u32; W] {
    let mut words = [0; W];
    words[0] = mode_word;
    for (n, (point, color)) in points.iter().zip(colors).enumerate() {
        words[1 + n * 2] = if n == 0 { color.command(op) } else { color.word() };
        words[2 + n * 2] = point.word();
    }
    words
}

pub fn sort_gpoly3(list: &mut OrderingTable, mode: &DrawMode, poly: &GPoly3) -> Result<()> {
    let res = resolve(0, poly.attribute, mode);
    let words: [u32; 7] = gouraud(res.opcode(opcode::GPOLY3), res.mode, &poly.points, &poly.colors);
    list.append(&words)?;
    Ok(())
}

pub fn sort_gpoly4(list: &mut OrderingTable, mode: &DrawMode, poly: &GPoly4) -> Result<()> {
    let res = resolve(0, poly.attribute, mode);
    let words: [u32; 9] = gouraud(res.opcode(opcode::GPOLY4), res.mode, &poly.points, &poly.colors);
    list.append(&words)?;
    Ok(())
}

/// UV word for textured vertex `n`. Vertex 0 carries the CLUT,
/// vertex 1 the texture page attribute.
#[inline]
fn tex_word(n: usize, uv: TexCoord, clut: ClutPos, texpage: u32) -> u32 {
    let high = match n {
        0 => clut.id(),
        1 => texpage,
        _ => 0,
    };
    (high << 16) | uv.word()
}

pub fn sort_tpoly3(list: &mut OrderingTable, mode: &DrawMode, poly: &TPoly3) -> Result<()> {
    let res = resolve(poly.tpage, poly.attribute, mode);
    let mut words = [0; 7];
    words[0] = poly.color.command(res.opcode(opcode::TPOLY3));
    for n in 0..3 {
        words[1 + n * 2] = poly.points[n].word();
        words[2 + n * 2] = tex_word(n, poly.uv[n], poly.clut, res.texpage());
    }
    list.append(&words)?;
    Ok(())
}

pub fn sort_tpoly4(list: &mut OrderingTable, mode: &DrawMode, poly: &TPoly4) -> Result<()> {
    let res = resolve(poly.tpage, poly.attribute, mode);
    let mut words = [0; 9];
    words[0] = poly.color.command(res.opcode(opcode::TPOLY4));
    for n in 0..4 {
        words[1 + n * 2] = poly.points[n].word();
        words[2 + n * 2] = tex_word(n, poly.uv[n], poly.clut, res.texpage());
    }
    list.append(&words)?;
    Ok(())
}

pub fn sort_gtpoly3(list: &mut OrderingTable, mode: &DrawMode, poly: &GTPoly3) -> Result<()> {
    let res = resolve(poly.tpage, poly.attribute, mode);
    let mut words = [0; 9];
    let op = res.opcode(opcode::GTPOLY3);
    for n in 0..3 {
        words[n * 3] = if n == 0 { poly.colors[n].command(op) } else { poly.colors[n].word() };
        words[1 + n * 3] = poly.points[n].word();
        words[2 + n * 3] = tex_word(n, poly.uv[n], poly.clut, res.texpage());
    }
    list.append(&words)?;
    Ok(())
}

pub fn sort_gtpoly4(list: &mut OrderingTable, mode: &DrawMode, poly: &GTPoly4) -> Result<()> {
    let res = resolve(poly.tpage, poly.attribute, mode);
    let mut words = [0; 12];
    let op = res.opcode(opcode::GTPOLY4);
    for n in 0..4 {
        words[n * 3] = if n == 0 { poly.colors[n].command(op) } else { poly.colors[n].word() };
        words[1 + n * 3] = poly.points[n].word();
        words[2 + n * 3] = tex_word(n, poly.uv[n], poly.clut, res.texpage());
    }
    list.append(&words)?;
    Ok(())
}

pub fn sort_line(list: &mut OrderingTable, mode: &DrawMode, line: &Line) -> Result<()> {
    let res = resolve(0, line.attribute, mode);
    let [v0, v1] = line.points;
    list.append(&[
        res.mode,
        line.color.command(res.opcode(opcode::LINE)),
        v0.word(),
        v1.word(),
    ])?;
    Ok(())
}

pub fn sort_gline(list: &mut OrderingTable, mode: &DrawMode, line: &GLine) -> Result<()> {
    let res = resolve(0, line.attribute, mode);
    let words: [u32; 5] = gouraud(res.opcode(opcode::GLINE), res.mode, &line.points, &line.colors);
    list.append(&words)?;
    Ok(())
}

/// Flat poly-line: mode, color, one word per point, terminator.
pub fn sort_polyline(list: &mut OrderingTable, mode: &DrawMode, line: &PolyLine) -> Result<()> {
    let res = resolve(0, line.attribute, mode);
    let mut entry = list.running(line.points.len() + 3)?;
    entry.push(res.mode);
    entry.push(line.color.command(res.opcode(opcode::POLYLINE)));
    for point in line.points {
        entry.push(point.word());
    }
    entry.push(POLYLINE_END);
    Ok(())
}

/// Gouraud poly-line: mode, then color and point per vertex, terminator.
pub fn sort_gpolyline(list: &mut OrderingTable, mode: &DrawMode, line: &GPolyLine) -> Result<()> {
    if line.colors.len() < line.points.len() {
        return Err(GsError::ColorCount {
            points: line.points.len(),
            colors: line.colors.len(),
        });
    }
    let res = resolve(0, line.attribute, mode);
    let op = res.opcode(opcode::GPOLYLINE);
    let mut entry = list.running(line.points.len() * 2 + 2)?;
    entry.push(res.mode);
    for (n, (point, color)) in line.points.iter().zip(line.colors).enumerate() {
        entry.push(if n == 0 { color.command(op) } else { color.word() });
        entry.push(point.word());
    }
    entry.push(POLYLINE_END);
    Ok(())
}

pub fn sort_dot(list: &mut OrderingTable, mode: &DrawMode, dot: &Dot) -> Result<()> {
    let res = resolve(0, dot.attribute, mode);
    list.append(&[
        res.mode,
        dot.color.command(res.opcode(opcode::DOT)),
        dot.point.word(),
    ])?;
    Ok(())
}

pub fn sort_rectangle(list: &mut OrderingTable, mode: &DrawMode, rect: &Rectangle) -> Result<()> {
    let res = resolve(0, rect.attribute, mode);
    list.append(&[
        res.mode,
        rect.color.command(res.opcode(opcode::RECT)),
        Vertex::new(rect.x, rect.y).word(),
        crate::utils::bits::pack_size(rect.w, rect.h),
    ])?;
    Ok(())
}

/// Fill the whole drawing area with one color.
pub fn sort_cls(list: &mut OrderingTable, mode: &DrawMode, color: Color) -> Result<()> {
    let (w, h) = mode.draw_size();
    sort_rectangle(list, mode, &Rectangle {
        x: 0,
        y: 0,
        w,
        h,
        color,
        attribute: Default::default(),
    })
}
