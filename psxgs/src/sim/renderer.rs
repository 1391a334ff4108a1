use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, AtomicUsize, Ordering}
};

use crossbeam_channel::Receiver;

use crate::{
    hw::GpuStatus,
    utils::bits::*
};

use super::packet::*;

pub enum RendererCmd {
    /// A word sent via GP0. This could be the start of a command,
    /// one of its parameters or image data.
    GP0(u32),

    // GP1 commands:
    Reset,
    ResetCommandBuffer,
}

/// Receives GP0 words on its own thread, frames them into packets and
/// keeps the draw mode part of the status register.
pub struct Renderer {
    // Comms
    command_rx: Receiver<RendererCmd>,
    atomic_status: Arc<AtomicU32>,
    in_flight: Arc<AtomicUsize>,
    packets: Arc<Mutex<Vec<Gp0Packet>>>,

    // Internal state
    status: GpuStatus,
    current: Vec<u32>,
    expect: Option<PacketLen>,
}

impl Renderer {
    pub fn new(
        command_rx: Receiver<RendererCmd>,
        status: Arc<AtomicU32>,
        in_flight: Arc<AtomicUsize>,
        packets: Arc<Mutex<Vec<Gp0Packet>>>
    ) -> Self {
        status.store(0, Ordering::Release);
        Self {
            command_rx,
            atomic_status: status,
            in_flight,
            packets,

            status: GpuStatus::empty(),
            current: Vec::new(),
            expect: None,
        }
    }

    /// Run in a separate thread until the front end goes away.
    pub fn run(&mut self) {
        use RendererCmd::*;
        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                GP0(data)          => self.recv_gp0_word(data),
                Reset              => self.reset(),
                ResetCommandBuffer => self.reset_command_buf(),
            }
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
        }
    }

    fn store_status(&self) {
        self.atomic_status.store(self.status.bits(), Ordering::Release);
    }
}

// GP1.
impl Renderer {
    fn reset(&mut self) {
        self.reset_command_buf();
        self.status = GpuStatus::empty();
        self.store_status();
    }

    fn reset_command_buf(&mut self) {
        if !self.current.is_empty() {
            log::trace!("dropping partial command {:08X}", self.current[0]);
        }
        self.current.clear();
        self.expect = None;
    }
}

// GP0.
impl Renderer {
    fn recv_gp0_word(&mut self, data: u32) {
        self.current.push(data);
        let expect = match self.expect {
            Some(expect) => expect,
            None => {
                let expect = packet_len(data);
                self.expect = Some(expect);
                expect
            }
        };
        let len = self.current.len();
        let done = match expect {
            PacketLen::Fixed(n) => len >= n,
            PacketLen::PolyLine { min } => len >= min && (data & POLYLINE_MASK) == POLYLINE_TERM,
            PacketLen::Image => len >= 3 && len >= 3 + image_words(self.current[2]),
        };
        if done {
            let packet = Gp0Packet { words: std::mem::take(&mut self.current) };
            self.expect = None;
            self.exec_gp0_command(packet);
        }
    }

    fn exec_gp0_command(&mut self, packet: Gp0Packet) {
        log::trace!("GP0 {:02X} {}: {} words", packet.opcode(), packet.name(), packet.words.len());
        let param = packet.words[0];
        match packet.opcode() {
            0x00..=0x02 | 0x1F | 0x20..=0xDF | 0xE2..=0xE5 => {},
            0xE1 => self.draw_mode_setting(param),
            0xE6 => self.mask_setting(param),
            op => log::warn!("unknown GP0 command {:02X} ({:08X})", op, param),
        }
        if let Ok(mut packets) = self.packets.lock() {
            packets.push(packet);
        }
    }

    fn draw_mode_setting(&mut self, param: u32) {
        let low_bits = param & 0x7FF;
        self.status.remove(GpuStatus::DrawModeFlags);
        self.status.insert(GpuStatus::from_bits_truncate(low_bits));
        self.status.set(GpuStatus::TexDisable, test_bit!(param, 11));
        self.store_status();
    }

    fn mask_setting(&mut self, param: u32) {
        self.status.set(GpuStatus::SetDrawMask, test_bit!(param, 0));
        self.status.set(GpuStatus::MaskDrawing, test_bit!(param, 1));
        self.store_status();
    }
}
