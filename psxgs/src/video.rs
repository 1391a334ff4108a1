//! Coprocessor bring-up and display timing.

use crate::{
    InitFlags,
    error::{GsError, Result},
    gpu::Gpu,
    hw::{gp1, GP0_RESET_BUFFER},
    poll::PollStrategy,
    utils::{bits::*, interface::Bus}
};

/// Television standard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VideoStandard {
    #[default]
    NTSC,
    PAL,
}

impl VideoStandard {
    /// GP1(06h) and GP1(07h) parameters: horizontal and vertical display range.
    pub const fn ranges(self) -> (u32, u32) {
        match self {
            VideoStandard::NTSC => (0xC4_E24E, 0x04_0010),
            VideoStandard::PAL  => (0xC6_2262, 0x04_B42D),
        }
    }
}

/// Display resolution and output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMode {
    pub width: u16,
    pub height: u16,
    pub standard: VideoStandard,
    /// 24-bit direct color output.
    pub rgb24: bool,
    pub interlace: bool,
    pub reverse: bool,
}

impl VideoMode {
    pub fn new(width: u16, height: u16, standard: VideoStandard) -> Self {
        Self {
            width, height, standard,
            rgb24: false,
            interlace: false,
            reverse: false,
        }
    }

    /// GP1(08h) parameter for this mode.
    pub fn mode_byte(&self) -> Result<u32> {
        let unsupported = GsError::UnsupportedResolution {
            width: self.width,
            height: self.height,
        };
        let vertical = match self.height {
            240 => 0,
            480 => bit!(2),
            _ => return Err(unsupported),
        };
        let horizontal = match self.width {
            256 => 0,
            320 => 1,
            512 => 2,
            640 => 3,
            384 => bit!(6),
            _ => return Err(unsupported),
        };
        let mut mode = horizontal | vertical;
        if self.standard == VideoStandard::PAL {
            mode |= bit!(3);
        }
        if self.rgb24 {
            mode |= bit!(4);
        }
        if self.interlace {
            mode |= bit!(5);
        }
        if self.reverse {
            mode |= bit!(7);
        }
        Ok(mode)
    }
}

impl<B: Bus, P: PollStrategy> Gpu<B, P> {
    /// Bring the coprocessor to a known state: reset, DMA channel on,
    /// DMA mode set, display off and command buffer cleared.
    pub fn init(&mut self, flags: InitFlags) {
        log::debug!("init with {:?}", flags);
        self.flags = flags;
        self.reset();
        self.dma_channel_enable();
        self.ctrl(gp1::DMA_MODE, gp1::DMA_MODE_CPU_TO_GP0);
        self.enable_display(false);
        self.gp0(GP0_RESET_BUFFER);
    }

    pub fn reset(&mut self) {
        self.ctrl(gp1::RESET, 0);
    }

    pub fn enable_display(&mut self, enable: bool) {
        self.ctrl(gp1::DISPLAY_ENABLE, if enable { 0 } else { 1 });
    }

    /// Program display ranges and resolution, then turn the display on.
    ///
    /// An unsupported resolution is rejected before any register is touched.
    pub fn set_video_mode(&mut self, mode: &VideoMode) -> Result<()> {
        let mode_byte = mode.mode_byte().inspect_err(|_| {
            log::error!("unsupported video mode {}x{}", mode.width, mode.height);
        })?;

        self.enable_display(false);
        let (range_x, range_y) = mode.standard.ranges();
        self.ctrl(gp1::RANGE_X, range_x);
        self.ctrl(gp1::RANGE_Y, range_y);
        self.ctrl(gp1::DISPLAY_MODE, mode_byte);
        self.enable_display(true);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mode_bytes() {
        let ntsc = VideoMode::new(320, 240, VideoStandard::NTSC);
        assert_eq!(ntsc.mode_byte(), Ok(1));

        let pal = VideoMode {
            interlace: true,
            rgb24: true,
            ..VideoMode::new(640, 480, VideoStandard::PAL)
        };
        assert_eq!(pal.mode_byte(), Ok(3 | 4 | 8 | 16 | 32));

        let wide = VideoMode { reverse: true, ..VideoMode::new(384, 240, VideoStandard::NTSC) };
        assert_eq!(wide.mode_byte(), Ok(64 | 128));
    }

    #[test]
    fn unknown_sizes() {
        assert_eq!(
            VideoMode::new(300, 240, VideoStandard::NTSC).mode_byte(),
            Err(GsError::UnsupportedResolution { width: 300, height: 240 })
        );
        assert_eq!(
            VideoMode::new(320, 200, VideoStandard::PAL).mode_byte(),
            Err(GsError::UnsupportedResolution { width: 320, height: 200 })
        );
    }
}
