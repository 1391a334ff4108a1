use thiserror::Error;

/// The status condition a poll loop was waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusWait {
    /// Primitive engine idle (status bit 26).
    CommandReady,
    /// Ready to receive a DMA block (status bit 28).
    DMARecvReady,
    /// Drawing finished after a flush.
    DrawingDone,
}

impl std::fmt::Display for StatusWait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusWait::CommandReady => write!(f, "command ready"),
            StatusWait::DMARecvReady => write!(f, "DMA receive ready"),
            StatusWait::DrawingDone => write!(f, "drawing to finish"),
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GsError {
    #[error("ordering table full: {needed} words at offset {offset} exceed capacity {capacity}")]
    TableFull {
        offset: usize,
        needed: usize,
        capacity: usize,
    },
    #[error("timed out waiting for {0}")]
    Timeout(StatusWait),
    #[error("unsupported video resolution {width}x{height}")]
    UnsupportedResolution {
        width: u16,
        height: u16,
    },
    #[error("image needs {needed} pixels but only {got} were given")]
    ImageTooSmall {
        needed: usize,
        got: usize,
    },
    #[error("gradient line has {points} points but {colors} colors")]
    ColorCount {
        points: usize,
        colors: usize,
    },
}

pub type Result<T> = std::result::Result<T, GsError>;
