use crate::{
    attrib::{resolve, Attribute},
    env::DrawMode,
    error::Result,
    ot::OrderingTable,
    prim::*,
    rotate::rotate_vector,
    utils::bits::*
};

use super::{opcode, sort_tpoly4};

/// Which packet a sprite becomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpritePath {
    /// Rotated about its pivot, drawn as a textured quad.
    Rotated,
    /// Flipped and/or scaled, drawn as an axis-aligned textured quad.
    Transformed,
    /// Plain sprite packet.
    Simple,
}

#[inline]
fn is_unit_scale(scale: i32) -> bool {
    (-1..=1).contains(&scale)
}

pub fn sprite_path(sprite: &Sprite) -> SpritePath {
    if sprite.rotate != 0 {
        SpritePath::Rotated
    } else if sprite.attribute.intersects(Attribute::HFlip | Attribute::VFlip)
        || !is_unit_scale(sprite.scale_x)
        || !is_unit_scale(sprite.scale_y)
    {
        SpritePath::Transformed
    } else {
        SpritePath::Simple
    }
}

/// Scaled edge length for the flip/scale path.
///
/// Computed wide and truncated, so any factor yields some length.
pub fn scale_edge(size: i32, scale: i32) -> i32 {
    let (size, scale) = (size as i64, scale as i64);
    let edge = if scale > 8 {
        (size * scale) / SCALE_ONE as i64
    } else if scale >= 2 {
        size * scale
    } else if scale <= -2 {
        size / -scale
    } else {
        size
    };
    edge as i32
}

/// Scaled edge length for the rotation path.
///
/// Below -8 the factor is a fixed-point divisor.
pub fn scaled_size(size: i32, scale: i32) -> i32 {
    let (size, scale, one) = (size as i64, scale as i64, SCALE_ONE as i64);
    let edge = if scale > 8 {
        (size * scale) / one
    } else if scale == 0 {
        size
    } else if scale > 0 {
        size * scale
    } else if scale > -8 {
        size / -scale
    } else {
        (size * one) / -scale
    };
    edge as i32
}

/// Append a sprite, picking the cheapest packet that can draw it.
pub fn sort_sprite(list: &mut OrderingTable, mode: &DrawMode, sprite: &Sprite) -> Result<()> {
    match sprite_path(sprite) {
        SpritePath::Rotated => sort_tpoly4(list, mode, &rotated_quad(sprite)),
        SpritePath::Transformed => sort_tpoly4(list, mode, &transformed_quad(sprite)),
        SpritePath::Simple => sort_simple_sprite(list, mode, sprite),
    }
}

/// Append a sprite as the plain sprite packet, ignoring flip, scale and rotation.
pub fn sort_simple_sprite(list: &mut OrderingTable, mode: &DrawMode, sprite: &Sprite) -> Result<()> {
    let res = resolve(sprite.tpage, sprite.attribute, mode);
    list.append(&[
        res.mode,
        sprite.color.command(res.opcode(opcode::SPRITE)),
        pack_coord(sprite.x, sprite.y),
        (sprite.clut.id() << 16) | pack_uv(sprite.u, sprite.v),
        pack_size(sprite.w, sprite.h),
    ])?;
    Ok(())
}

fn quad_base(sprite: &Sprite) -> TPoly4 {
    TPoly4 {
        color: sprite.color,
        tpage: sprite.tpage,
        clut: sprite.clut,
        attribute: sprite.attribute,
        ..Default::default()
    }
}

/// Texel coordinate `base + offset`, wrapped to the byte the packet carries.
#[inline]
fn texel(base: u8, offset: i32) -> u8 {
    (base as i32 + offset) as u8
}

fn transformed_quad(sprite: &Sprite) -> TPoly4 {
    let sx = sprite.x as i32 & COORD_MASK as i32;
    let sy = sprite.y as i32 & COORD_MASK as i32;
    let w = (sprite.w as i32).min(256);
    let h = (sprite.h as i32).min(256);
    let x1 = sx.wrapping_add(scale_edge(w, sprite.scale_x));
    let y1 = sy.wrapping_add(scale_edge(h, sprite.scale_y));

    let (left, right) = if sprite.attribute.contains(Attribute::HFlip) {
        (texel(sprite.u, sprite.w as i32 - 1), sprite.u)
    } else {
        (sprite.u, texel(sprite.u, sprite.w as i32))
    };
    let (top, bottom) = if sprite.attribute.contains(Attribute::VFlip) {
        (texel(sprite.v, sprite.h as i32 - 1), sprite.v)
    } else {
        (sprite.v, texel(sprite.v, sprite.h as i32))
    };

    TPoly4 {
        points: [
            Vertex::new(sx as i16, sy as i16),
            Vertex::new(sx as i16, y1 as i16),
            Vertex::new(x1 as i16, sy as i16),
            Vertex::new(x1 as i16, y1 as i16),
        ],
        uv: [
            TexCoord::new(left, top),
            TexCoord::new(left, bottom),
            TexCoord::new(right, top),
            TexCoord::new(right, bottom),
        ],
        ..quad_base(sprite)
    }
}

fn rotated_quad(sprite: &Sprite) -> TPoly4 {
    let x = sprite.x as i64;
    let y = sprite.y as i64;
    let cx = x + sprite.pivot_x as i64;
    let cy = y + sprite.pivot_y as i64;
    let right = x + scaled_size(sprite.w as i32, sprite.scale_x) as i64;
    let bottom = y + scaled_size(sprite.h as i32, sprite.scale_y) as i64;

    // Corners relative to the pivot, Y pointing up.
    let corners = [
        [-(cx - x), cy - y],
        [-(cx - x), cy - bottom],
        [-(cx - right), cy - y],
        [-(cx - right), cy - bottom],
    ];
    let points = corners.map(|[dx, dy]| {
        let [rx, ry, _] = rotate_vector(0, 0, sprite.rotate, [dx as f64, dy as f64, 0.0]);
        Vertex::new(
            (cx as f64 + rx) as i64 as i16,
            (cy as f64 + ry) as i64 as i16,
        )
    });

    let w = sprite.w as i32;
    let h = sprite.h as i32;
    TPoly4 {
        points,
        uv: [
            TexCoord::new(sprite.u, sprite.v),
            TexCoord::new(sprite.u, texel(sprite.v, h)),
            TexCoord::new(texel(sprite.u, w), sprite.v),
            TexCoord::new(texel(sprite.u, w), texel(sprite.v, h)),
        ],
        ..quad_base(sprite)
    }
}
