/// Errors returned for arguments the detector cannot work with.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastError {
    #[error("barrier must be non-negative (got {0})")]
    NegativeBarrier(i32),
    #[error("point ({x}, {y}) is too close to the border of a {width}x{height} image")]
    PointOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("arc length must be in 7..=12 (got {0})")]
    InvalidArcLength(u8),
}

pub(crate) fn check_barrier(barrier: i32) -> Result<(), FastError> {
    if barrier < 0 {
        return Err(FastError::NegativeBarrier(barrier));
    }
    Ok(())
}
