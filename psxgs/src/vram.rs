//! Direct VRAM access: uploads, copies and fills.
//!
//! These bypass the ordering table and write straight to the data port.

use crate::{
    error::{GsError, Result, StatusWait},
    gpu::Gpu,
    hw::gp1,
    poll::PollStrategy,
    prim::Color,
    utils::{bits::pack_size, interface::Bus}
};

/// VRAM width in 16-bit pixels.
pub const VRAM_WIDTH: u16 = 1024;
/// VRAM height in lines.
pub const VRAM_HEIGHT: u16 = 512;

/// GP0 command words used here.
mod gp0 {
    pub const FILL: u32       = 0x0200_0000;
    pub const COPY: u32       = 0x8000_0000;
    pub const LOAD: u32       = 0xA000_0000;
    pub const MASK_CLEAR: u32 = 0xE600_0000;
}

#[inline]
const fn pack_pos(x: u16, y: u16) -> u32 {
    ((y as u32) << 16) | (x as u32)
}

impl<B: Bus, P: PollStrategy> Gpu<B, P> {
    /// Register mode with masking off, ready for a raw VRAM command.
    fn begin_vram(&mut self) -> Result<()> {
        self.begin_pio()?;
        self.gp0(gp0::MASK_CLEAR);
        Ok(())
    }

    /// Upload a `w` by `h` block of 16-bit pixels to VRAM at (x, y).
    ///
    /// Pixels go two per word, low half first. An odd pixel count is
    /// padded with one zero pixel.
    pub fn load_image(&mut self, pixels: &[u16], x: u16, y: u16, w: u16, h: u16) -> Result<()> {
        let count = w as usize * h as usize;
        if pixels.len() < count {
            return Err(GsError::ImageTooSmall { needed: count, got: pixels.len() });
        }
        log::debug!("load image {}x{} to ({}, {})", w, h, x, y);

        self.wait_for(StatusWait::DrawingDone)?;
        self.begin_vram()?;
        self.gp0(gp0::LOAD);
        self.gp0(pack_pos(x, y));
        self.gp0(pack_size(w, h));
        for pair in pixels[..count].chunks(2) {
            let lo = pair[0] as u32;
            let hi = pair.get(1).copied().unwrap_or(0) as u32;
            self.gp0((hi << 16) | lo);
        }
        self.gp1(gp1::command(gp1::RESET_BUFFER, 0));
        Ok(())
    }

    /// Copy a `w` by `h` block from (src_x, src_y) to (dst_x, dst_y) within VRAM.
    pub fn move_image(&mut self, src_x: u16, src_y: u16, dst_x: u16, dst_y: u16, w: u16, h: u16) -> Result<()> {
        self.begin_vram()?;
        self.gp0(gp0::COPY);
        self.gp0(pack_pos(src_x, src_y));
        self.gp0(pack_pos(dst_x, dst_y));
        self.gp0(pack_size(w, h));
        Ok(())
    }

    /// Fill a VRAM rectangle with a flat color, ignoring the draw environment.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) -> Result<()> {
        self.begin_vram()?;
        self.data_ctrl(gp0::FILL | color.word());
        self.gp0(pack_pos(x, y));
        self.gp0(pack_size(w, h));
        Ok(())
    }

    /// Clear all of VRAM to black.
    ///
    /// The fill command cannot reach the last line and column in one go,
    /// so the edges get their own fills.
    pub fn clear_vram(&mut self) -> Result<()> {
        let (w, h) = (VRAM_WIDTH - 1, VRAM_HEIGHT - 1);
        let black = Color::default();
        self.fill_rect(0, 0, w, h, black)?;
        self.wait_for(StatusWait::DrawingDone)?;
        self.fill_rect(0, h, w, 1, black)?;
        self.wait_for(StatusWait::DrawingDone)?;
        self.fill_rect(w, h, 1, 1, black)?;
        self.wait_for(StatusWait::DrawingDone)
    }
}
