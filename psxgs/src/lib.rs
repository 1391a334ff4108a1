mod utils;

pub mod attrib;
pub mod encode;
pub mod env;
pub mod error;
pub mod gpu;
pub mod hw;
pub mod ot;
pub mod poll;
pub mod prim;
pub mod rotate;
pub mod sim;
pub mod transfer;
pub mod video;
pub mod vram;

pub use attrib::{Attribute, ColorMode, TransMode};
pub use env::{DispEnv, DrawEnv, DrawMode, Masking};
pub use error::{GsError, Result, StatusWait};
pub use gpu::Gpu;
pub use ot::OrderingTable;
pub use poll::{Bounded, BusySpin, PollStrategy, YieldSpin};
pub use prim::*;
pub use transfer::TransferMode;
pub use utils::bits::{clut_id, texture_page};
pub use utils::interface::{Bus, DMASource, MemInterface};
pub use video::{VideoMode, VideoStandard};

bitflags::bitflags! {
    /// Options for `Gs::init`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InitFlags: u32 {
        /// No BIOS to set the DMA controller up: flush through the data port instead.
        const NO_BIOS = 1;
    }
}

/// Config for a graphics system.
#[derive(Clone, Copy, Debug, Default)]
pub struct GsConfig {
    pub flags: InitFlags,
    /// Block after each flush until drawing is done.
    pub autowait: bool,
}

/// The graphics system: coprocessor access, draw mode state and the
/// ordering table being built.
///
/// Primitives are encoded into the table as they are sorted, and reach the
/// coprocessor only on `draw_list`.
pub struct Gs<'a, B: Bus, P: PollStrategy = BusySpin> {
    gpu: Gpu<B, P>,
    mode: DrawMode,
    list: OrderingTable<'a>,
}

impl<'a, B: Bus> Gs<'a, B, BusySpin> {
    pub fn new(bus: B, list: &'a mut [u32]) -> Self {
        Self::with_poll(bus, BusySpin, list)
    }
}

impl<'a, B: Bus, P: PollStrategy> Gs<'a, B, P> {
    pub fn with_poll(bus: B, poll: P, list: &'a mut [u32]) -> Self {
        Self {
            gpu: Gpu::with_poll(bus, poll),
            mode: DrawMode::new(),
            list: OrderingTable::new(list),
        }
    }

    pub fn gpu(&self) -> &Gpu<B, P> {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut Gpu<B, P> {
        &mut self.gpu
    }

    pub fn bus(&self) -> &B {
        self.gpu.bus()
    }

    pub fn draw_mode(&self) -> &DrawMode {
        &self.mode
    }

    pub fn list(&self) -> &OrderingTable<'a> {
        &self.list
    }

    /// Reset the coprocessor and apply `config`.
    pub fn init(&mut self, config: GsConfig) {
        self.gpu.init(config.flags);
        self.gpu.set_autowait(config.autowait);
    }

    pub fn reset(&mut self) {
        self.gpu.reset();
    }

    pub fn enable_display(&mut self, enable: bool) {
        self.gpu.enable_display(enable);
    }

    pub fn set_video_mode(&mut self, mode: &VideoMode) -> Result<()> {
        self.gpu.set_video_mode(mode)
    }

    pub fn set_autowait(&mut self, autowait: bool) {
        self.gpu.set_autowait(autowait);
    }

    pub fn is_drawing(&mut self) -> bool {
        self.gpu.is_drawing()
    }
}

// Ordering table.
impl<'a, B: Bus, P: PollStrategy> Gs<'a, B, P> {
    /// Install a new list buffer with the cursor at its start.
    pub fn set_list(&mut self, list: &'a mut [u32]) {
        self.list = OrderingTable::new(list);
    }

    /// Install a list buffer with the cursor at `position`.
    ///
    /// Panics if `position` lies beyond the buffer.
    pub fn set_list_ex(&mut self, list: &'a mut [u32], position: usize) {
        self.list = OrderingTable::with_position(list, position);
    }

    pub fn list_position(&self) -> usize {
        self.list.position()
    }

    /// Send the list to the coprocessor, by DMA unless `InitFlags::NO_BIOS` is set.
    pub fn draw_list(&mut self) -> Result<()> {
        self.gpu.draw_list(&mut self.list)
    }

    pub fn draw_list_pio(&mut self) -> Result<()> {
        self.gpu.draw_list_pio(&mut self.list)
    }
}

// Environment.
impl<B: Bus, P: PollStrategy> Gs<'_, B, P> {
    /// Apply a draw environment right away.
    pub fn set_draw_env(&mut self, env: &DrawEnv) {
        self.gpu.set_draw_env(&mut self.mode, env);
    }

    /// Apply a draw environment when the list is drawn.
    pub fn set_draw_env_queued(&mut self, env: &DrawEnv) -> Result<()> {
        env::queue_draw_env(&mut self.list, &mut self.mode, env)
    }

    pub fn set_disp_env(&mut self, env: &DispEnv) {
        self.gpu.set_disp_env(env);
    }

    pub fn set_disp_env_queued(&mut self, env: &DispEnv) -> Result<()> {
        env::queue_disp_env(&mut self.list, env)
    }

    pub fn set_masking(&mut self, masking: Masking) {
        self.gpu.set_masking(&mut self.mode, masking);
    }
}

// Primitives.
impl<B: Bus, P: PollStrategy> Gs<'_, B, P> {
    pub fn sort(&mut self, prim: &Primitive) -> Result<()> {
        encode::sort(&mut self.list, &mut self.mode, prim)
    }

    pub fn sort_poly3(&mut self, poly: &Poly3) -> Result<()> {
        encode::sort_poly3(&mut self.list, &self.mode, poly)
    }

    pub fn sort_poly4(&mut self, poly: &Poly4) -> Result<()> {
        encode::sort_poly4(&mut self.list, &self.mode, poly)
    }

    pub fn sort_gpoly3(&mut self, poly: &GPoly3) -> Result<()> {
        encode::sort_gpoly3(&mut self.list, &self.mode, poly)
    }

    pub fn sort_gpoly4(&mut self, poly: &GPoly4) -> Result<()> {
        encode::sort_gpoly4(&mut self.list, &self.mode, poly)
    }

    pub fn sort_tpoly3(&mut self, poly: &TPoly3) -> Result<()> {
        encode::sort_tpoly3(&mut self.list, &self.mode, poly)
    }

    pub fn sort_tpoly4(&mut self, poly: &TPoly4) -> Result<()> {
        encode::sort_tpoly4(&mut self.list, &self.mode, poly)
    }

    pub fn sort_gtpoly3(&mut self, poly: &GTPoly3) -> Result<()> {
        encode::sort_gtpoly3(&mut self.list, &self.mode, poly)
    }

    pub fn sort_gtpoly4(&mut self, poly: &GTPoly4) -> Result<()> {
        encode::sort_gtpoly4(&mut self.list, &self.mode, poly)
    }

    pub fn sort_line(&mut self, line: &Line) -> Result<()> {
        encode::sort_line(&mut self.list, &self.mode, line)
    }

    pub fn sort_gline(&mut self, line: &GLine) -> Result<()> {
        encode::sort_gline(&mut self.list, &self.mode, line)
    }

    pub fn sort_polyline(&mut self, line: &PolyLine) -> Result<()> {
        encode::sort_polyline(&mut self.list, &self.mode, line)
    }

    pub fn sort_gpolyline(&mut self, line: &GPolyLine) -> Result<()> {
        encode::sort_gpolyline(&mut self.list, &self.mode, line)
    }

    pub fn sort_dot(&mut self, dot: &Dot) -> Result<()> {
        encode::sort_dot(&mut self.list, &self.mode, dot)
    }

    pub fn sort_sprite(&mut self, sprite: &Sprite) -> Result<()> {
        encode::sort_sprite(&mut self.list, &self.mode, sprite)
    }

    /// Sort a sprite as the plain sprite packet, ignoring flip, scale and rotation.
    pub fn sort_simple_sprite(&mut self, sprite: &Sprite) -> Result<()> {
        encode::sort_simple_sprite(&mut self.list, &self.mode, sprite)
    }

    pub fn sort_rectangle(&mut self, rect: &Rectangle) -> Result<()> {
        encode::sort_rectangle(&mut self.list, &self.mode, rect)
    }

    /// Clear the draw area to `color`.
    pub fn sort_cls(&mut self, color: Color) -> Result<()> {
        encode::sort_cls(&mut self.list, &self.mode, color)
    }
}

// VRAM.
impl<B: Bus, P: PollStrategy> Gs<'_, B, P> {
    pub fn load_image(&mut self, pixels: &[u16], x: u16, y: u16, w: u16, h: u16) -> Result<()> {
        self.gpu.load_image(pixels, x, y, w, h)
    }

    pub fn move_image(&mut self, src_x: u16, src_y: u16, dst_x: u16, dst_y: u16, w: u16, h: u16) -> Result<()> {
        self.gpu.move_image(src_x, src_y, dst_x, dst_y, w, h)
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) -> Result<()> {
        self.gpu.fill_rect(x, y, w, h, color)
    }

    pub fn clear_vram(&mut self) -> Result<()> {
        self.gpu.clear_vram()
    }
}
