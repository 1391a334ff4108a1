//! Register-level access to the coprocessor: command dispatch and status polling.

use crate::{
    InitFlags,
    error::{GsError, Result, StatusWait},
    hw::{self, gp1, GpuStatus, GP0, GP1, GP0_RESET_BUFFER},
    poll::{BusySpin, PollStrategy},
    utils::interface::Bus
};

/// Owns the bus to the coprocessor and the way we wait on it.
pub struct Gpu<B: Bus, P: PollStrategy = BusySpin> {
    pub(crate) bus: B,
    pub(crate) poll: P,
    pub(crate) flags: InitFlags,
    pub(crate) autowait: bool,
}

impl<B: Bus> Gpu<B, BusySpin> {
    pub fn new(bus: B) -> Self {
        Self::with_poll(bus, BusySpin)
    }
}

impl<B: Bus, P: PollStrategy> Gpu<B, P> {
    pub fn with_poll(bus: B, poll: P) -> Self {
        Self {
            bus,
            poll,
            flags: InitFlags::empty(),
            autowait: false,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    pub fn flags(&self) -> InitFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: InitFlags) {
        self.flags = flags;
    }

    /// Make every flush block until the coprocessor stops drawing.
    pub fn set_autowait(&mut self, autowait: bool) {
        self.autowait = autowait;
    }

    pub fn autowait(&self) -> bool {
        self.autowait
    }

    pub fn status(&mut self) -> GpuStatus {
        GpuStatus::from_bits_retain(self.bus.read_word(GP1))
    }

    /// True while the primitive engine is busy.
    pub fn is_drawing(&mut self) -> bool {
        !self.status().is_idle()
    }

    /// Spin until the status register satisfies `what`.
    pub fn wait_for(&mut self, what: StatusWait) -> Result<()> {
        let limit = self.poll.limit();
        let mut reads = 0u32;
        loop {
            let status = self.status();
            let done = match what {
                StatusWait::CommandReady | StatusWait::DrawingDone => status.contains(GpuStatus::CommandReady),
                StatusWait::DMARecvReady => status.contains(GpuStatus::DMARecvReady),
            };
            if done {
                return Ok(());
            }
            reads += 1;
            if limit.is_some_and(|limit| reads >= limit) {
                log::warn!("gave up waiting for {} after {} status reads", what, reads);
                return Err(GsError::Timeout(what));
            }
            self.poll.pause();
        }
    }
}

// Port writes.
impl<B: Bus, P: PollStrategy> Gpu<B, P> {
    /// Write a raw word to GP0.
    #[inline]
    pub fn gp0(&mut self, data: u32) {
        self.bus.write_word(GP0, data);
    }

    /// Write a raw word to GP1.
    #[inline]
    pub fn gp1(&mut self, data: u32) {
        self.bus.write_word(GP1, data);
    }

    /// Reset the command buffer, then issue a GP1 command.
    pub fn ctrl(&mut self, command: u32, param: u32) {
        self.gp1(gp1::command(gp1::RESET_BUFFER, 0));
        self.gp1(gp1::command(command, param));
    }

    /// Reset the command buffer, then send a single-word GP0 command.
    pub fn data_ctrl(&mut self, word: u32) {
        self.gp1(gp1::command(gp1::RESET_BUFFER, 0));
        self.gp0(word);
    }

    /// Put the coprocessor in register mode: wait for it to accept
    /// commands, turn off DMA requests and clear its command buffer.
    pub(crate) fn begin_pio(&mut self) -> Result<()> {
        self.wait_for(StatusWait::DMARecvReady)?;
        self.gp1(gp1::command(gp1::DMA_MODE, gp1::DMA_MODE_OFF));
        self.gp0(GP0_RESET_BUFFER);
        Ok(())
    }

    pub(crate) fn dma_channel_enable(&mut self) {
        let dpcr = self.bus.read_word(hw::DPCR);
        self.bus.write_word(hw::DPCR, dpcr | hw::DMAControl::DMA2Enable.bits());
    }
}
