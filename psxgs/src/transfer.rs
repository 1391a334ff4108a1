//! Draining an ordering table into the coprocessor.
//!
//! Two paths: a chained DMA transfer that the coprocessor walks on its own,
//! and a register-by-register fallback for when DMA cannot be trusted.
//! Both are busy-wait loops on the status register.

use crate::{
    InitFlags,
    encode::{ends_polyline, starts_polyline},
    error::{Result, StatusWait},
    gpu::Gpu,
    hw::{self, gp1, ChannelControl, GP0_RESET_BUFFER},
    ot::OrderingTable,
    poll::PollStrategy,
    utils::interface::Bus
};

/// How a flush reaches the coprocessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    DMA,
    PIO,
}

impl<B: Bus, P: PollStrategy> Gpu<B, P> {
    /// The path `draw_list` will take.
    pub fn transfer_mode(&self) -> TransferMode {
        if self.flags.contains(InitFlags::NO_BIOS) {
            TransferMode::PIO
        } else {
            TransferMode::DMA
        }
    }

    /// Send the ordering table to the coprocessor and reset its cursor.
    ///
    /// The table must not be touched again until the coprocessor has
    /// finished reading it. With autowait set this returns only once
    /// drawing is done.
    pub fn draw_list(&mut self, list: &mut OrderingTable) -> Result<()> {
        match self.transfer_mode() {
            TransferMode::DMA => self.draw_list_dma(list),
            TransferMode::PIO => self.draw_list_pio(list),
        }
    }

    /// Chained DMA transfer.
    pub fn draw_list_dma(&mut self, list: &mut OrderingTable) -> Result<()> {
        list.terminate()?;

        let base = self.bus.dma_address(list.buffer());
        list.link(base);
        self.bus.dma_sync(&list.buffer()[..=list.position()]);
        log::debug!("DMA flush: {} words from {:06X}", list.position(), base);

        self.wait_for(StatusWait::CommandReady)?;
        self.wait_for(StatusWait::DMARecvReady)?;

        self.ctrl(gp1::DMA_MODE, gp1::DMA_MODE_CPU_TO_GP0);
        self.bus.write_word(hw::D2_MADR, base);
        self.bus.write_word(hw::D2_BCR, 0);
        self.bus.write_word(hw::D2_CHCR, ChannelControl::LIST_TO_DEVICE.bits());

        list.reset();
        self.finish_flush()
    }

    /// Register-by-register transfer.
    ///
    /// The command buffer is reset before each entry, except where an entry
    /// carries on a poly-line split from the one before.
    pub fn draw_list_pio(&mut self, list: &mut OrderingTable) -> Result<()> {
        log::debug!("PIO flush: {} words", list.position());

        self.wait_for(StatusWait::DMARecvReady)?;
        self.gp1(gp1::command(gp1::DMA_MODE, gp1::DMA_MODE_OFF));

        let mut open = false;
        for entry in list.entries() {
            self.wait_for(StatusWait::DMARecvReady)?;
            if !open {
                self.gp0(GP0_RESET_BUFFER);
            }
            open = leaves_polyline_open(entry.payload, open);

            log::trace!("PIO entry at {}: {} words", entry.origin, entry.payload.len());
            for &word in entry.payload {
                self.gp0(word);
            }
        }

        list.reset();
        self.finish_flush()
    }

    fn finish_flush(&mut self) -> Result<()> {
        if self.autowait {
            self.wait_for(StatusWait::DrawingDone)?;
        }
        Ok(())
    }
}

/// Whether a poly-line is still unterminated after `payload`.
///
/// Entries start on packet boundaries, with the mode word ahead of the
/// command, unless they continue a split poly-line.
fn leaves_polyline_open(payload: &[u32], open: bool) -> bool {
    let started = open || payload.get(1).is_some_and(|&cmd| starts_polyline(cmd));
    started && payload.last().is_some_and(|&word| !ends_polyline(word))
}
