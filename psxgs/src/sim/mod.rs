//! A software model of the coprocessor and its DMA channel.
//!
//! The front end sits on the bus: it owns the GP1 side of the status
//! register and the DMA channel registers. GP0 words go over a channel to a
//! renderer thread, which frames them into packets and records them.
//! Chained DMA transfers are walked from a private copy of the list, made
//! by `dma_sync`.

mod packet;
mod renderer;

pub use packet::{image_words, packet_len, Gp0Packet, PacketLen};

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, AtomicUsize, Ordering}
    },
    thread::JoinHandle
};

use crossbeam_channel::{bounded, Sender};

use crate::{
    hw::{self, ChannelControl, GpuStatus},
    utils::{bits::*, interface::{DMASource, MemInterface}}
};

use renderer::*;

/// Bus address the simulated RAM holding the list starts at.
pub const SIM_LIST_BASE: u32 = 0x0010_0000;

/// DPCR value after reset.
const DPCR_RESET: u32 = 0x0765_4321;

/// Simulated coprocessor.
pub struct SimulatedGpu {
    // GP1 side of the status register.
    status: GpuStatus,
    display_offset: (u16, u16),
    range_x: u32,
    range_y: u32,

    // DMA channel 2.
    dpcr: u32,
    madr: u32,
    bcr: u32,
    chcr: u32,
    ram: Vec<u32>,

    renderer_status: Arc<AtomicU32>,
    in_flight: Arc<AtomicUsize>,
    packets: Arc<Mutex<Vec<Gp0Packet>>>,
    renderer_tx: Option<Sender<RendererCmd>>,
    renderer_thread: Option<JoinHandle<()>>,
}

impl SimulatedGpu {
    pub fn new() -> Self {
        let (tx, rx) = bounded(256);
        let renderer_status = Arc::new(AtomicU32::new(0));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let packets = Arc::new(Mutex::new(Vec::new()));

        let mut renderer = Renderer::new(rx, renderer_status.clone(), in_flight.clone(), packets.clone());
        // Start render thread.
        let renderer_thread = std::thread::spawn(move || renderer.run());

        Self {
            status: GpuStatus::DisplayDisable,
            display_offset: (0, 0),
            range_x: 0,
            range_y: 0,

            dpcr: DPCR_RESET,
            madr: 0,
            bcr: 0,
            chcr: 0,
            ram: Vec::new(),

            renderer_status,
            in_flight,
            packets,
            renderer_tx: Some(tx),
            renderer_thread: Some(renderer_thread),
        }
    }

    /// Block until the renderer has consumed every word sent so far.
    pub fn wait_idle(&self) {
        while self.in_flight.load(Ordering::Acquire) != 0 {
            std::thread::yield_now();
        }
    }

    /// Every packet received so far, after waiting for the renderer to catch up.
    pub fn packets(&self) -> Vec<Gp0Packet> {
        self.wait_idle();
        self.packets.lock().unwrap().clone()
    }

    /// Like `packets`, but also forgets them.
    pub fn take_packets(&self) -> Vec<Gp0Packet> {
        self.wait_idle();
        std::mem::take(&mut *self.packets.lock().unwrap())
    }

    pub fn display_enabled(&self) -> bool {
        !self.status.contains(GpuStatus::DisplayDisable)
    }

    pub fn display_offset(&self) -> (u16, u16) {
        self.display_offset
    }

    /// Horizontal and vertical display range, as last set with GP1(06h) and GP1(07h).
    pub fn display_ranges(&self) -> (u32, u32) {
        (self.range_x, self.range_y)
    }

    pub fn dma_enabled(&self) -> bool {
        self.dpcr & hw::DMAControl::DMA2Enable.bits() != 0
    }

    /// The full status register, as a read of GP1 would see it.
    pub fn read_status(&self) -> GpuStatus {
        let mut status = self.status | GpuStatus::from_bits_retain(self.renderer_status.load(Ordering::Acquire));
        status.insert(GpuStatus::DMARecvReady);
        status.set(GpuStatus::CommandReady, self.in_flight.load(Ordering::Acquire) == 0);
        status
    }
}

impl Default for SimulatedGpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SimulatedGpu {
    fn drop(&mut self) {
        // Closing the channel ends the render thread.
        self.renderer_tx = None;
        if let Some(thread) = self.renderer_thread.take() {
            let _ = thread.join();
        }
    }
}

impl MemInterface for SimulatedGpu {
    fn read_word(&mut self, addr: u32) -> u32 {
        match addr {
            hw::GP0 => 0,
            hw::GP1 => self.read_status().bits(),
            hw::DPCR => self.dpcr,
            hw::D2_MADR => self.madr,
            hw::D2_BCR => self.bcr,
            hw::D2_CHCR => self.chcr,
            _ => {
                log::warn!("read from unmapped address {:08X}", addr);
                0
            }
        }
    }

    fn write_word(&mut self, addr: u32, data: u32) {
        match addr {
            hw::GP0 => self.send(RendererCmd::GP0(data)),
            hw::GP1 => self.send_gp1_command(data),
            hw::DPCR => self.dpcr = data,
            hw::D2_MADR => self.madr = data & 0x00FF_FFFF,
            hw::D2_BCR => self.bcr = data,
            hw::D2_CHCR => self.write_chcr(data),
            _ => log::warn!("write {:08X} to unmapped address {:08X}", data, addr),
        }
    }
}

impl DMASource for SimulatedGpu {
    fn dma_address(&self, _words: &[u32]) -> u32 {
        SIM_LIST_BASE
    }

    fn dma_sync(&mut self, words: &[u32]) {
        self.ram.clear();
        self.ram.extend_from_slice(words);
    }
}

// Internal
impl SimulatedGpu {
    fn send(&mut self, cmd: RendererCmd) {
        if let Some(tx) = &self.renderer_tx {
            self.in_flight.fetch_add(1, Ordering::AcqRel);
            if tx.send(cmd).is_err() {
                self.in_flight.fetch_sub(1, Ordering::AcqRel);
                log::warn!("renderer thread has stopped");
            }
        }
    }

    fn dma_mode(&self) -> u32 {
        self.status.dma_mode()
    }
}

// GP1 commands
impl SimulatedGpu {
    fn send_gp1_command(&mut self, data: u32) {
        log::trace!("GP1 command: {:08X}", data);
        let param = data & 0x00FF_FFFF;
        match data >> 24 {
            hw::gp1::RESET => self.reset(),
            hw::gp1::RESET_BUFFER => self.send(RendererCmd::ResetCommandBuffer),
            hw::gp1::DISPLAY_ENABLE => self.status.set(GpuStatus::DisplayDisable, test_bit!(param, 0)),
            hw::gp1::DMA_MODE => self.data_request(param),
            hw::gp1::DISPLAY_OFFSET => {
                self.display_offset = ((param & 0x3FF) as u16, ((param >> 10) & 0x1FF) as u16);
            },
            hw::gp1::RANGE_X => self.range_x = param,
            hw::gp1::RANGE_Y => self.range_y = param,
            hw::gp1::DISPLAY_MODE => self.display_mode(param),
            cmd => log::warn!("unknown GP1 command {:02X}", cmd),
        }
    }

    fn reset(&mut self) {
        self.status = GpuStatus::DisplayDisable;
        self.display_offset = (0, 0);
        self.send(RendererCmd::Reset);
    }

    fn data_request(&mut self, param: u32) {
        self.status.remove(GpuStatus::DMAMode);
        self.status.insert(GpuStatus::from_bits_truncate((param & 0x3) << 29));
    }

    fn display_mode(&mut self, param: u32) {
        let mut display_status = GpuStatus::empty();
        display_status.insert(GpuStatus::from_bits_truncate((param & 0x3F) << 17));
        display_status.insert(GpuStatus::from_bits_truncate((param & 0x40) << 10)); // HRes low bit
        display_status.insert(GpuStatus::from_bits_truncate((param & 0x80) << 7)); // Reverseflag
        self.status.remove(GpuStatus::DispModeFlags);
        self.status.insert(display_status);
    }
}

// DMA channel 2
impl SimulatedGpu {
    fn write_chcr(&mut self, data: u32) {
        let control = ChannelControl::from_bits_retain(data);
        self.chcr = data;
        if control.contains(ChannelControl::StartBusy) && control.sync_mode() == 2 {
            self.run_linked_list();
            self.chcr &= !(ChannelControl::StartBusy | ChannelControl::StartTrigger).bits();
        }
    }

    fn ram_word(&self, addr: u32) -> Option<u32> {
        let offset = addr.checked_sub(SIM_LIST_BASE)?;
        self.ram.get((offset / 4) as usize).copied()
    }

    /// Walk a linked list from MADR, feeding each payload to GP0.
    fn run_linked_list(&mut self) {
        if !self.dma_enabled() {
            log::warn!("DMA started with channel 2 disabled in DPCR");
            return;
        }
        let to_gp0 = self.dma_mode() == 2;
        if !to_gp0 {
            log::warn!("linked list sent while GP1(04h) mode is {}", self.dma_mode());
        }

        let mut addr = self.madr;
        let mut entries = 0;
        loop {
            let Some(header) = self.ram_word(addr) else {
                log::warn!("DMA list runs off into unmapped address {:06X}", addr);
                break;
            };
            let count = header >> 24;
            for n in 1..=count {
                let word = self.ram_word(addr + n * 4).unwrap_or(0);
                if to_gp0 {
                    self.send(RendererCmd::GP0(word));
                }
            }
            entries += 1;
            let next = header & 0x00FF_FFFF;
            if test_bit!(next, 23) {
                break;
            }
            if entries > self.ram.len() {
                log::warn!("DMA list loops at {:06X}", addr);
                break;
            }
            addr = next;
        }
        self.madr = 0x00FF_FFFF;
        log::trace!("DMA list done: {} entries", entries);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[should_panic]
    fn poisoned_packet_log_is_reported() {
        let gpu = SimulatedGpu::new();
        let packets = gpu.packets.clone();
        let _ = std::thread::spawn(move || {
            let _guard = packets.lock().unwrap();
            panic!("renderer died");
        }).join();
        gpu.packets();
    }

    #[test]
    fn status_after_reset() {
        let mut gpu = SimulatedGpu::new();
        gpu.write_word(hw::GP1, 0);
        gpu.wait_idle();
        let status = gpu.read_status();
        assert!(status.contains(GpuStatus::CommandReady | GpuStatus::DMARecvReady));
        assert!(!gpu.display_enabled());
    }

    #[test]
    fn draw_mode_reaches_status() {
        let mut gpu = SimulatedGpu::new();
        gpu.write_word(hw::GP0, 0xE100_0600);
        gpu.write_word(hw::GP0, 0xE600_0003);
        gpu.write_word(hw::GP1, 0x0400_0002);
        gpu.wait_idle();
        let status = gpu.read_status();
        assert!(status.contains(GpuStatus::Dither | GpuStatus::DrawDisplay));
        assert!(status.contains(GpuStatus::MaskFlags));
        assert_eq!(status.dma_mode(), 2);
    }

    #[test]
    fn frames_poly_line() {
        let mut gpu = SimulatedGpu::new();
        for word in [0x4800_00FF, 0, 0x0010_0010, 0x0020_0000, 0x5555_5555, 0x2000_0000] {
            gpu.write_word(hw::GP0, word);
        }
        let packets = gpu.packets();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].words.len(), 5);
    }

    #[test]
    fn walks_linked_list() {
        let mut gpu = SimulatedGpu::new();
        gpu.write_word(hw::DPCR, DPCR_RESET | hw::DMAControl::DMA2Enable.bits());
        gpu.write_word(hw::GP1, 0x0400_0002);
        let base = SIM_LIST_BASE;
        let list = [
            (1 << 24) | (base + 8),
            0xE100_0000,
            (1 << 24) | (base + 16),
            0xE600_0001,
            0x00FF_FFFF,
        ];
        gpu.dma_sync(&list);
        gpu.write_word(hw::D2_MADR, base);
        gpu.write_word(hw::D2_CHCR, ChannelControl::LIST_TO_DEVICE.bits());
        let ops = gpu.packets().iter().map(Gp0Packet::opcode).collect::<Vec<_>>();
        assert_eq!(ops, vec![0xE1, 0xE6]);
        assert_eq!(gpu.read_word(hw::D2_CHCR) & ChannelControl::StartBusy.bits(), 0);
    }
}
