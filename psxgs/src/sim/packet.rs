//! GP0 packet framing.

/// How many words a GP0 command takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketLen {
    Fixed(usize),
    /// Open-ended line strip. Ends with a terminator word once at least
    /// `min` words have arrived.
    PolyLine { min: usize },
    /// Image upload: three words, then pixel data sized by the third.
    Image,
}

/// Words ending a poly-line match this under `POLYLINE_MASK`.
pub const POLYLINE_TERM: u32 = 0x5000_5000;
pub const POLYLINE_MASK: u32 = 0xF000_F000;

/// Frame a command from its first word.
pub fn packet_len(word: u32) -> PacketLen {
    let op = (word >> 24) as u8;
    match op {
        0x02 => PacketLen::Fixed(3),
        0x20..=0x3F => {
            let verts = if op & 0x08 != 0 { 4 } else { 3 };
            let tex = ((op >> 2) & 1) as usize;
            let gouraud = if op & 0x10 != 0 { verts - 1 } else { 0 };
            PacketLen::Fixed(1 + verts * (1 + tex) + gouraud)
        },
        0x40..=0x5F => {
            let gouraud = op & 0x10 != 0;
            match (op & 0x08 != 0, gouraud) {
                (false, false) => PacketLen::Fixed(3),
                (false, true)  => PacketLen::Fixed(4),
                (true, false)  => PacketLen::PolyLine { min: 3 },
                (true, true)   => PacketLen::PolyLine { min: 4 },
            }
        },
        0x60..=0x7F => {
            let tex = ((op >> 2) & 1) as usize;
            let variable = ((op >> 3) & 3 == 0) as usize;
            PacketLen::Fixed(2 + tex + variable)
        },
        0x80..=0x9F => PacketLen::Fixed(4),
        0xA0..=0xBF => PacketLen::Image,
        0xC0..=0xDF => PacketLen::Fixed(3),
        _ => PacketLen::Fixed(1),
    }
}

/// Pixel data words following an image upload's size word.
pub fn image_words(size: u32) -> usize {
    let w = (size & 0xFFFF) as usize;
    let h = (size >> 16) as usize;
    (w * h).div_ceil(2)
}

/// A complete GP0 command as the coprocessor received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gp0Packet {
    pub words: Vec<u32>,
}

impl Gp0Packet {
    pub fn opcode(&self) -> u8 {
        self.words.first().map_or(0, |w| (w >> 24) as u8)
    }

    /// Anything that draws pixels: polygons, lines and rectangles.
    pub fn is_primitive(&self) -> bool {
        (0x20..=0x7F).contains(&self.opcode())
    }

    pub fn name(&self) -> &'static str {
        match self.opcode() {
            0x00 => "nop",
            0x01 => "clear cache",
            0x02 => "fill",
            0x20..=0x3F => match self.opcode() & 0x14 {
                0x00 => "flat polygon",
                0x04 => "textured polygon",
                0x10 => "gouraud polygon",
                0x14 => "gouraud textured polygon",
                _ => unreachable!(),
            },
            0x40..=0x5F if self.opcode() & 0x08 != 0 => "poly-line",
            0x40..=0x5F => "line",
            0x60..=0x7F if self.opcode() & 0x04 != 0 => "sprite",
            0x60..=0x7F => "rectangle",
            0x80..=0x9F => "vram copy",
            0xA0..=0xBF => "image load",
            0xC0..=0xDF => "image store",
            0xE1 => "draw mode",
            0xE2 => "texture window",
            0xE3 => "draw area top-left",
            0xE4 => "draw area bottom-right",
            0xE5 => "draw offset",
            0xE6 => "mask bits",
            _ => "unknown",
        }
    }
}
