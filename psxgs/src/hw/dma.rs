use crate::utils::bits::*;

bitflags::bitflags! {
    /// DPCR: per-channel enable and priority.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DMAControl: u32 {
        const DMA6Enable    = bit!(27);
        const DMA5Enable    = bit!(23);
        const DMA4Enable    = bit!(19);
        const DMA3Enable    = bit!(15);
        /// Channel 2 feeds the GPU.
        const DMA2Enable    = bit!(11);
        const DMA2Priority  = bits![8, 9, 10];
        const DMA1Enable    = bit!(7);
        const DMA0Enable    = bit!(3);
    }
}

bitflags::bitflags! {
    /// CHCR for a single DMA channel.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChannelControl: u32 {
        const StartTrigger      = bit!(28);
        const StartBusy         = bit!(24);
        const ChopCPUWindowSize = bits![20, 21, 22];
        const ChopDMAWindowSize = bits![16, 17, 18];
        /// Sync mode 2: linked list.
        const LinkedList        = bit!(10);
        /// Sync mode 1: blocks on request.
        const Request           = bit!(9);
        const SyncMode          = bits![9, 10];
        const ChopEnable        = bit!(8);
        const DecAddr           = bit!(1);
        const TransferDir       = bit!(0); // 1 = From RAM
    }
}

impl ChannelControl {
    /// Start a linked-list transfer from RAM to the device.
    pub const LIST_TO_DEVICE: Self = Self::StartBusy
        .union(Self::LinkedList)
        .union(Self::TransferDir);

    pub fn sync_mode(self) -> u32 {
        (self & ChannelControl::SyncMode).bits() >> 9
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn linked_list_start_word() {
        assert_eq!(ChannelControl::LIST_TO_DEVICE.bits(), 0x0100_0401);
        assert_eq!(ChannelControl::LIST_TO_DEVICE.sync_mode(), 2);
    }
}
