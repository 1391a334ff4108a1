use crate::utils::bits::*;

bitflags::bitflags! {
    /// GPU status register, read from GP1.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct GpuStatus: u32 {
        const InterlaceOdd  = bit!(31);
        const DMAMode       = bits![29, 30];
        const DMARecvReady  = bit!(28);
        const VRAMSendReady = bit!(27);
        /// Set while the primitive engine is idle and can take a new command.
        const CommandReady  = bit!(26);
        const DMARequest    = bit!(25);
        const IRQ           = bit!(24);
        const DisplayDisable = bit!(23);
        const Interlace     = bit!(22);
        const ColorDepth    = bit!(21);
        const PALMode       = bit!(20);
        const YResolution   = bit!(19);
        const XResolution   = bits![16, 17, 18];
        const TexDisable    = bit!(15);
        const Reverse       = bit!(14);
        const InterlaceField = bit!(13);
        const MaskDrawing   = bit!(12);
        const SetDrawMask   = bit!(11);
        const DrawDisplay   = bit!(10);
        const Dither        = bit!(9);
        const TexPageCol    = bits![7, 8];
        const SemiTrans     = bits![5, 6];
        const TexPageYBase  = bit!(4);
        const TexPageXBase  = bits![0, 1, 2, 3];

        const DispModeFlags = bits![14, 16, 17, 18, 19, 20, 21, 22];
        const DrawModeFlags = bits![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15];
        const MaskFlags     = bits![11, 12];
    }
}

impl GpuStatus {
    /// DMA mode as last set with GP1(04h).
    pub fn dma_mode(self) -> u32 {
        (self & GpuStatus::DMAMode).bits() >> 29
    }

    /// The primitive engine has nothing left to draw.
    pub fn is_idle(self) -> bool {
        self.contains(GpuStatus::CommandReady)
    }
}
