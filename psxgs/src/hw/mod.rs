//! Coprocessor register map and raw bus access.

mod status;
mod dma;

pub use status::GpuStatus;
pub use dma::{ChannelControl, DMAControl};

use crate::utils::interface::{DMASource, MemInterface};

/// GP0: command and payload stream.
pub const GP0: u32 = 0x1F80_1810;
/// GP1: control commands on write, status register on read.
pub const GP1: u32 = 0x1F80_1814;

/// DMA control register (channel enables and priorities).
pub const DPCR: u32 = 0x1F80_10F0;
/// DMA channel 2 (GPU) base address.
pub const D2_MADR: u32 = 0x1F80_10A0;
/// DMA channel 2 block control.
pub const D2_BCR: u32 = 0x1F80_10A4;
/// DMA channel 2 channel control.
pub const D2_CHCR: u32 = 0x1F80_10A8;

/// Header link value that ends a linked-list transfer.
pub const LIST_END: u32 = 0x00FF_FFFF;

/// GP0(01h): clear the command buffer.
pub const GP0_RESET_BUFFER: u32 = 0x0100_0000;

/// GP1 commands.
pub mod gp1 {
    pub const RESET: u32 = 0x00;
    pub const RESET_BUFFER: u32 = 0x01;
    pub const DISPLAY_ENABLE: u32 = 0x03;
    pub const DMA_MODE: u32 = 0x04;
    pub const DISPLAY_OFFSET: u32 = 0x05;
    pub const RANGE_X: u32 = 0x06;
    pub const RANGE_Y: u32 = 0x07;
    pub const DISPLAY_MODE: u32 = 0x08;

    /// GP1(04h) parameter: CPU to GP0 via DMA.
    pub const DMA_MODE_CPU_TO_GP0: u32 = 2;
    /// GP1(04h) parameter: no DMA.
    pub const DMA_MODE_OFF: u32 = 0;

    /// Build a GP1 command word.
    #[inline]
    pub const fn command(cmd: u32, param: u32) -> u32 {
        (cmd << 24) | (param & 0x00FF_FFFF)
    }
}

/// Direct access to the memory-mapped registers of the real machine.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Must only be called when running on the target machine,
    /// and only one `Mmio` may exist at a time.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl MemInterface for Mmio {
    fn read_word(&mut self, addr: u32) -> u32 {
        // SAFETY: `Mmio::new` guarantees we run on hardware where `addr` is mapped.
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write_word(&mut self, addr: u32, data: u32) {
        // SAFETY: see `read_word`.
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, data) }
    }
}

impl DMASource for Mmio {
    fn dma_address(&self, words: &[u32]) -> u32 {
        (words.as_ptr() as usize as u32) & 0x00FF_FFFF
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dma_address_is_24_bit() {
        // SAFETY: only address translation is used, no register is touched.
        let mmio = unsafe { Mmio::new() };
        let words = [0u32; 4];
        let addr = mmio.dma_address(&words);
        assert_eq!(addr, (words.as_ptr() as usize as u32) & 0x00FF_FFFF);
        assert_eq!(addr & !LIST_END, 0);
    }

    #[test]
    fn gp1_command_words() {
        assert_eq!(gp1::command(gp1::DMA_MODE, gp1::DMA_MODE_CPU_TO_GP0), 0x0400_0002);
        assert_eq!(gp1::command(gp1::DISPLAY_ENABLE, 0x1FF_FFFF), 0x03FF_FFFF);
    }
}
