/// Errors raised while constructing an [`AnalogClock`](crate::AnalogClock).
///
/// Only construction can fail; every steady-state operation is total.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The surface factory produced a surface without a 2D drawing context.
    #[error("drawing surface has no 2D context")]
    ContextUnavailable,
}
