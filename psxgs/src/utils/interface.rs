/// Memory interface with a 32-bit data bus.
///
/// Every access is side-effecting and must reach the device in program order.
pub trait MemInterface {
    fn read_word(&mut self, addr: u32) -> u32;

    fn write_word(&mut self, addr: u32, data: u32);
}

/// Memory that the DMA controller can read a linked list from.
pub trait DMASource {
    /// The bus address the DMA controller sees for the start of `words`.
    fn dma_address(&self, words: &[u32]) -> u32;

    /// Make CPU writes to `words` visible to the DMA controller.
    ///
    /// Called after the list is finalised and before the channel is started.
    fn dma_sync(&mut self, _words: &[u32]) {}
}

/// Everything the transfer engine needs from the system bus.
pub trait Bus: MemInterface + DMASource {}

impl<T: MemInterface + DMASource> Bus for T {}
