//! Draw and display environments, and the draw mode they leave behind.

use crate::{
    error::Result,
    gpu::Gpu,
    hw::gp1,
    ot::OrderingTable,
    poll::PollStrategy,
    utils::{bits::*, interface::Bus}
};

bitflags::bitflags! {
    /// GP0(E6h) mask bit setting.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Masking: u32 {
        /// Set the mask bit on every drawn pixel.
        const Set    = bit!(0);
        /// Do not draw over pixels with the mask bit set.
        const Ignore = bit!(1);
    }
}

/// Drawing area, offset and mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawEnv {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
    pub dither: bool,
    pub draw_on_display: bool,
    pub set_mask: bool,
    pub ignore_mask: bool,
}

impl DrawEnv {
    /// Drawing area at (x, y) of size (w, h), drawing allowed on the
    /// displayed area, no dithering, no masking.
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            x, y, w, h,
            draw_on_display: true,
            ..Default::default()
        }
    }

    /// The stored GP0(E1h) word: draw-on-display and dither bits only.
    pub fn mode_packet(&self) -> u32 {
        (0xE1 << 24)
            | ((self.draw_on_display as u32) << 10)
            | ((self.dither as u32) << 9)
    }

    pub fn masking(&self) -> Masking {
        let mut masking = Masking::empty();
        masking.set(Masking::Set, self.set_mask);
        masking.set(Masking::Ignore, self.ignore_mask);
        masking
    }

    /// The five GP0 words that establish this environment:
    /// draw mode, texture window off, area top-left, area bottom-right, offset.
    pub fn commands(&self) -> [u32; 5] {
        let x = self.x as u32;
        let y = self.y as u32;
        let end_x = (x + self.w as u32).wrapping_sub(1);
        let end_y = (y + self.h as u32).wrapping_sub(1);
        [
            self.mode_packet(),
            0xE2 << 24,
            (0xE3 << 24) | ((y & 0x3FF) << 10) | (x & 0x3FF),
            (0xE4 << 24) | ((end_y & 0x3FF) << 10) | (end_x & 0x3FF),
            (0xE5 << 24) | ((y & 0x7FF) << 11) | (x & 0x7FF),
        ]
    }
}

/// Display area origin in VRAM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispEnv {
    pub x: u16,
    pub y: u16,
}

impl DispEnv {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Display offset parameter for GP1(05h).
    pub fn offset_param(&self) -> u32 {
        ((self.y as u32 & 0x3FF) << 10) | (self.x as u32 & 0x3FF)
    }

    /// Display offset as a single command word.
    pub fn command(&self) -> u32 {
        gp1::command(gp1::DISPLAY_OFFSET, self.offset_param())
    }
}

/// Persistent draw mode state.
///
/// Written by the environment calls, read by attribute resolution for every
/// primitive encoded afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawMode {
    packet: u32,
    masking: Masking,
    width: u16,
    height: u16,
}

impl DrawMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored mode packet that every resolved mode word starts from.
    pub fn packet(&self) -> u32 {
        self.packet
    }

    pub fn dither(&self) -> bool {
        test_bit!(self.packet, 9)
    }

    pub fn draw_on_display(&self) -> bool {
        test_bit!(self.packet, 10)
    }

    pub fn masking(&self) -> Masking {
        self.masking
    }

    /// Size of the current drawing area.
    pub fn draw_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn apply_draw_env(&mut self, env: &DrawEnv) {
        self.packet = env.mode_packet();
        self.width = env.w;
        self.height = env.h;
    }

    pub fn set_masking(&mut self, masking: Masking) {
        self.masking = masking;
    }
}

/// Queue a draw environment as one ordering table entry.
pub fn queue_draw_env(list: &mut OrderingTable, mode: &mut DrawMode, env: &DrawEnv) -> Result<()> {
    list.append(&env.commands())?;
    mode.apply_draw_env(env);
    Ok(())
}

/// Queue a display environment as one ordering table entry.
pub fn queue_disp_env(list: &mut OrderingTable, env: &DispEnv) -> Result<()> {
    list.append(&[env.command()])?;
    Ok(())
}

// Immediate mode.
impl<B: Bus, P: PollStrategy> Gpu<B, P> {
    /// Write a draw environment straight to the data port.
    pub fn set_draw_env(&mut self, mode: &mut DrawMode, env: &DrawEnv) {
        for word in env.commands() {
            self.data_ctrl(word);
        }
        mode.apply_draw_env(env);
        self.set_masking(mode, env.masking());
    }

    /// Set the display area origin.
    pub fn set_disp_env(&mut self, env: &DispEnv) {
        self.ctrl(gp1::DISPLAY_OFFSET, env.offset_param());
    }

    pub fn set_masking(&mut self, mode: &mut DrawMode, masking: Masking) {
        self.data_ctrl((0xE6 << 24) | masking.bits());
        mode.set_masking(masking);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ot::header;
    use proptest::prelude::*;

    #[test]
    fn clip_extent_is_inclusive() {
        let env = DrawEnv::new(0, 256, 320, 240);
        let cmds = env.commands();
        assert_eq!(cmds[0], 0xE100_0400);
        assert_eq!(cmds[1], 0xE200_0000);
        assert_eq!(cmds[2], 0xE300_0000 | (256 << 10));
        assert_eq!(cmds[3], 0xE400_0000 | (495 << 10) | 319);
        assert_eq!(cmds[4], 0xE500_0000 | (256 << 11));
    }

    #[test]
    fn queued_draw_env_is_one_entry() {
        let mut buf = [0u32; 16];
        let mut ot = OrderingTable::new(&mut buf);
        let mut mode = DrawMode::new();
        let env = DrawEnv { dither: true, ..DrawEnv::new(0, 0, 256, 240) };
        queue_draw_env(&mut ot, &mut mode, &env).unwrap();
        assert_eq!(ot.as_words()[0], header(5, 6));
        assert_eq!(&ot.as_words()[1..], &env.commands());
        assert!(mode.dither());
        assert_eq!(mode.packet(), 0xE100_0600);
        assert_eq!(mode.draw_size(), (256, 240));
    }

    #[test]
    fn queued_disp_env() {
        let mut buf = [0u32; 4];
        let mut ot = OrderingTable::new(&mut buf);
        queue_disp_env(&mut ot, &DispEnv::new(0, 240)).unwrap();
        assert_eq!(ot.as_words(), &[header(1, 2), 0x0500_0000 | (240 << 10)]);
    }

    proptest! {
        #[test]
        fn env_words_keep_their_opcodes(x: u16, y: u16, w: u16, h: u16, dither: bool, on_display: bool) {
            let env = DrawEnv { dither, draw_on_display: on_display, ..DrawEnv::new(x, y, w, h) };
            let ops = env.commands().map(|word| word >> 24);
            prop_assert_eq!(ops, [0xE1, 0xE2, 0xE3, 0xE4, 0xE5]);
            prop_assert_eq!(env.commands()[0] & !0xFF00_0600, 0);
        }

        #[test]
        fn masking_round_trips(set_mask: bool, ignore_mask: bool) {
            let env = DrawEnv { set_mask, ignore_mask, ..DrawEnv::new(0, 0, 320, 240) };
            let masking = env.masking();
            prop_assert_eq!(masking.contains(Masking::Set), set_mask);
            prop_assert_eq!(masking.contains(Masking::Ignore), ignore_mask);
            prop_assert_eq!(masking.bits() & !3, 0);
        }
    }
}
