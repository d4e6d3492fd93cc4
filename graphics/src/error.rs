//! Render batch error types.

use thiserror::Error;

use crate::shader::ShaderHandle;

/// Errors raised by [`RenderBatch`](crate::RenderBatch) misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// `begin()` was called while a batch is in progress.
    #[error("batch already begun, call end() first")]
    AlreadyBegun,
    /// A batch operation was called before `begin()`.
    #[error("batch not begun, call begin() first")]
    NotBegun,
    /// The shader provider has no shader able to draw a renderable.
    #[error("no shader can render this renderable")]
    NoShader,
    /// A handle does not name a shader of the provider.
    #[error("unknown shader {0:?}")]
    UnknownShader(ShaderHandle),
}

pub type BatchResult<T> = Result<T, BatchError>;
