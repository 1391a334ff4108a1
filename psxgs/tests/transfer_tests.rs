//! Register-level tests against a bus that records every write.
//!
//! The mock reports a fixed status word, so each test decides whether the
//! coprocessor looks idle, busy or stuck.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use psxgs::{
    hw::{self, ChannelControl, GpuStatus},
    ot::header,
    *
};

/// Captured write: (address, data).
type WriteRecord = (u32, u32);

const LIST_BASE: u32 = 0x0008_0000;

#[derive(Clone)]
struct MockBus {
    writes: Rc<RefCell<Vec<WriteRecord>>>,
    synced: Rc<RefCell<Vec<u32>>>,
    status: Rc<Cell<u32>>,
    dpcr: Rc<Cell<u32>>,
}

impl MockBus {
    fn new() -> Self {
        Self {
            writes: Rc::new(RefCell::new(Vec::new())),
            synced: Rc::new(RefCell::new(Vec::new())),
            status: Rc::new(Cell::new((GpuStatus::CommandReady | GpuStatus::DMARecvReady).bits())),
            dpcr: Rc::new(Cell::new(0)),
        }
    }

    fn set_status(&self, status: GpuStatus) {
        self.status.set(status.bits());
    }

    fn writes(&self) -> Vec<WriteRecord> {
        self.writes.borrow().clone()
    }

    fn clear(&self) {
        self.writes.borrow_mut().clear();
    }

    fn writes_to(&self, addr: u32) -> Vec<u32> {
        self.writes.borrow().iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, d)| *d)
            .collect()
    }
}

impl MemInterface for MockBus {
    fn read_word(&mut self, addr: u32) -> u32 {
        match addr {
            hw::GP1 => self.status.get(),
            hw::DPCR => self.dpcr.get(),
            _ => 0,
        }
    }

    fn write_word(&mut self, addr: u32, data: u32) {
        if addr == hw::DPCR {
            self.dpcr.set(data);
        }
        self.writes.borrow_mut().push((addr, data));
    }
}

impl DMASource for MockBus {
    fn dma_address(&self, _words: &[u32]) -> u32 {
        LIST_BASE
    }

    fn dma_sync(&mut self, words: &[u32]) {
        *self.synced.borrow_mut() = words.to_vec();
    }
}

fn red_triangle() -> Poly3 {
    Poly3 {
        points: [Vertex::new(0, 0), Vertex::new(10, 0), Vertex::new(0, 10)],
        color: Color::new(255, 0, 0),
        attribute: Attribute::empty(),
    }
}

#[test]
fn init_sequence() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    gs.init(GsConfig::default());

    assert_eq!(bus.writes(), vec![
        (hw::GP1, 0x0100_0000), (hw::GP1, 0x0000_0000),
        (hw::DPCR, 0x0000_0800),
        (hw::GP1, 0x0100_0000), (hw::GP1, 0x0400_0002),
        (hw::GP1, 0x0100_0000), (hw::GP1, 0x0300_0001),
        (hw::GP0, 0x0100_0000),
    ]);
    assert_eq!(gs.gpu().transfer_mode(), TransferMode::DMA);
}

#[test]
fn dma_flush_programs_channel() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    {
        let mut gs = Gs::new(bus.clone(), &mut buf);
        gs.sort_poly3(&red_triangle()).unwrap();
        assert_eq!(gs.list_position(), 6);
        gs.draw_list().unwrap();
        assert_eq!(gs.list_position(), 0);
    }

    assert_eq!(bus.writes(), vec![
        (hw::GP1, 0x0100_0000),
        (hw::GP1, 0x0400_0002),
        (hw::D2_MADR, LIST_BASE),
        (hw::D2_BCR, 0),
        (hw::D2_CHCR, ChannelControl::LIST_TO_DEVICE.bits()),
    ]);
    assert_eq!(buf[0], header(5, LIST_BASE + 6 * 4));
    assert_eq!(buf[6], hw::LIST_END);

    let synced = bus.synced.borrow();
    assert_eq!(synced.len(), 7);
    assert_eq!(synced[6], hw::LIST_END);
}

#[test]
fn pio_flush_streams_entries() {
    let bus = MockBus::new();
    let mut buf = [0u32; 32];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    gs.init(GsConfig { flags: InitFlags::NO_BIOS, autowait: false });
    assert_eq!(gs.gpu().transfer_mode(), TransferMode::PIO);
    bus.clear();

    gs.sort_poly3(&red_triangle()).unwrap();
    gs.sort_line(&Line::default()).unwrap();
    gs.draw_list().unwrap();
    assert_eq!(gs.list_position(), 0);

    let writes = bus.writes();
    assert_eq!(writes[0], (hw::GP1, 0x0400_0000));
    let gp0 = bus.writes_to(hw::GP0);
    assert_eq!(gp0.len(), 1 + 5 + 1 + 4);
    assert_eq!(gp0[0], hw::GP0_RESET_BUFFER);
    assert_eq!(gp0[2], 0x2000_00FF);
    assert_eq!(gp0[6], hw::GP0_RESET_BUFFER);
    assert_eq!(gp0[8], 0x4000_0000);
    assert!(bus.writes_to(hw::D2_CHCR).is_empty());
}

#[test]
fn pio_flush_preserves_table_words() {
    let bus = MockBus::new();
    let mut buf = [0u32; 32];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    gs.sort_poly3(&red_triangle()).unwrap();
    let words = gs.list().as_words().to_vec();
    gs.draw_list_pio().unwrap();

    let streamed = bus.writes_to(hw::GP0);
    assert_eq!(&streamed[1..], &words[1..]);
}

#[test]
fn stuck_status_times_out_when_bounded() {
    let bus = MockBus::new();
    bus.set_status(GpuStatus::DMARecvReady);
    let mut buf = [0u32; 16];
    let mut gs = Gs::with_poll(bus.clone(), Bounded::new(BusySpin, 100), &mut buf);
    gs.sort_poly3(&red_triangle()).unwrap();

    let err = gs.draw_list().unwrap_err();
    assert_eq!(err, GsError::Timeout(StatusWait::CommandReady));
    assert!(bus.writes_to(hw::D2_CHCR).is_empty());
}

#[test]
fn autowait_blocks_after_pio_flush() {
    let bus = MockBus::new();
    bus.set_status(GpuStatus::DMARecvReady);
    let mut buf = [0u32; 16];
    let mut gs = Gs::with_poll(bus.clone(), Bounded::new(BusySpin, 10), &mut buf);
    gs.set_autowait(true);
    gs.sort_poly3(&red_triangle()).unwrap();

    let err = gs.draw_list_pio().unwrap_err();
    assert_eq!(err, GsError::Timeout(StatusWait::DrawingDone));
    assert_eq!(bus.writes_to(hw::GP0).len(), 6);
    assert_eq!(gs.list_position(), 0);
    assert!(gs.is_drawing());
}

#[test]
fn immediate_draw_env() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    let env = DrawEnv { dither: true, set_mask: true, ..DrawEnv::new(0, 0, 320, 240) };
    gs.set_draw_env(&env);

    let gp0 = bus.writes_to(hw::GP0);
    assert_eq!(&gp0[..5], &env.commands());
    assert_eq!(gp0[5], 0xE600_0001);
    assert_eq!(bus.writes_to(hw::GP1), vec![0x0100_0000; 6]);
    assert!(gs.draw_mode().dither());
    assert_eq!(gs.draw_mode().masking(), Masking::Set);
    assert!(gs.list().is_empty());
}

#[test]
fn immediate_draw_env_dithers_textured_quad() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    gs.set_draw_env(&DrawEnv { dither: true, ..DrawEnv::new(0, 0, 320, 240) });
    gs.sort_tpoly4(&TPoly4::default()).unwrap();

    let page_word = gs.list().as_words()[5];
    assert_ne!(page_word & (1 << (16 + 9)), 0);
}

#[test]
fn pio_keeps_split_polyline_whole() {
    let bus = MockBus::new();
    let mut buf = vec![0u32; 512];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    let points = (0..300).map(|n| Vertex::new(n, n)).collect::<Vec<_>>();
    gs.sort_polyline(&PolyLine {
        points: &points,
        color: Color::default(),
        attribute: Attribute::empty(),
    }).unwrap();
    gs.sort_poly3(&red_triangle()).unwrap();
    assert_eq!(gs.list().entries().count(), 3);
    gs.draw_list_pio().unwrap();

    let gp0 = bus.writes_to(hw::GP0);
    assert_eq!(gp0.len(), 1 + 303 + 1 + 5);
    assert_eq!(gp0[0], hw::GP0_RESET_BUFFER);
    assert!(!gp0[1..304].contains(&hw::GP0_RESET_BUFFER));
    assert_eq!(gp0[303], psxgs::encode::POLYLINE_END);
    assert_eq!(gp0[304], hw::GP0_RESET_BUFFER);
    assert_eq!(gp0[306], 0x2000_00FF);
}

#[test]
fn display_env() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    gs.set_disp_env(&DispEnv::new(0, 256));
    assert_eq!(bus.writes_to(hw::GP1), vec![0x0100_0000, 0x0500_0000 | (256 << 10)]);

    gs.set_disp_env_queued(&DispEnv::new(320, 0)).unwrap();
    assert_eq!(gs.list().as_words(), &[header(1, 2), 0x0500_0000 | 320]);
}

#[test]
fn video_mode() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);

    let err = gs.set_video_mode(&VideoMode::new(400, 240, VideoStandard::NTSC)).unwrap_err();
    assert_eq!(err, GsError::UnsupportedResolution { width: 400, height: 240 });
    assert!(bus.writes().is_empty());

    gs.set_video_mode(&VideoMode::new(320, 240, VideoStandard::PAL)).unwrap();
    assert_eq!(bus.writes_to(hw::GP1), vec![
        0x0100_0000, 0x0300_0001,
        0x0100_0000, 0x06C6_2262,
        0x0100_0000, 0x0704_B42D,
        0x0100_0000, 0x0800_0009,
        0x0100_0000, 0x0300_0000,
    ]);
}

#[test]
fn load_image_packs_pixels() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);

    let err = gs.load_image(&[1, 2], 0, 0, 3, 1).unwrap_err();
    assert_eq!(err, GsError::ImageTooSmall { needed: 3, got: 2 });
    assert!(bus.writes().is_empty());

    gs.load_image(&[0x1111, 0x2222, 0x3333], 640, 256, 3, 1).unwrap();
    assert_eq!(bus.writes(), vec![
        (hw::GP1, 0x0400_0000),
        (hw::GP0, 0x0100_0000),
        (hw::GP0, 0xE600_0000),
        (hw::GP0, 0xA000_0000),
        (hw::GP0, (256 << 16) | 640),
        (hw::GP0, 0x0001_0003),
        (hw::GP0, 0x2222_1111),
        (hw::GP0, 0x0000_3333),
        (hw::GP1, 0x0100_0000),
    ]);
}

#[test]
fn vram_copy_and_fill() {
    let bus = MockBus::new();
    let mut buf = [0u32; 16];
    let mut gs = Gs::new(bus.clone(), &mut buf);

    gs.move_image(0, 0, 320, 0, 320, 240).unwrap();
    assert_eq!(bus.writes_to(hw::GP0), vec![
        0x0100_0000, 0xE600_0000, 0x8000_0000, 0, 320, (240 << 16) | 320,
    ]);
    bus.clear();

    gs.fill_rect(16, 32, 64, 48, Color::new(1, 2, 3)).unwrap();
    assert_eq!(bus.writes_to(hw::GP0), vec![
        0x0100_0000, 0xE600_0000, 0x0203_0201, (32 << 16) | 16, (48 << 16) | 64,
    ]);
    bus.clear();

    gs.clear_vram().unwrap();
    let fills = bus.writes_to(hw::GP0).into_iter()
        .filter(|w| w >> 24 == 0x02)
        .count();
    assert_eq!(fills, 3);
}

#[test]
fn full_table_reports_error() {
    let bus = MockBus::new();
    let mut buf = [0u32; 8];
    let mut gs = Gs::new(bus.clone(), &mut buf);
    gs.sort_poly3(&red_triangle()).unwrap();
    let err = gs.sort_poly3(&red_triangle()).unwrap_err();
    assert_eq!(err, GsError::TableFull { offset: 6, needed: 6, capacity: 8 });
    assert_eq!(gs.list_position(), 6);
}

#[test]
fn set_list_ex_resumes() {
    let bus = MockBus::new();
    let mut first = [0u32; 16];
    let mut second = [0u32; 16];
    let mut third = [0u32; 4];
    let mut gs = Gs::new(bus.clone(), &mut first);
    gs.sort_dot(&Dot::default()).unwrap();
    assert_eq!(gs.list_position(), 4);

    gs.set_list_ex(&mut second, 4);
    assert_eq!(gs.list_position(), 4);
    gs.sort_dot(&Dot::default()).unwrap();
    assert_eq!(gs.list().as_words()[4], header(3, 8));

    gs.set_list(&mut third);
    assert_eq!(gs.list_position(), 0);
}
