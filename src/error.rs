//! Error type.

/// Errors that can occur while constructing an engine.
///
/// The audio path itself has no failure modes: all parameters are clamped on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The injected allocator could not provide a buffer.
    #[error("allocator could not provide {bytes} bytes of buffer memory")]
    OutOfMemory { bytes: usize },
}
