use thiserror::Error;

use crate::surfaces::Viewport;

pub type Result<T> = std::result::Result<T, BloomError>;

#[derive(Debug, Error)]
pub enum BloomError {
    #[error("browser object unavailable: {0}")]
    MissingBrowserObject(&'static str),

    #[error("WebGL2 is not supported by this browser")]
    WebGl2Unsupported,

    #[error("shader failed to compile: {0}")]
    ShaderCompile(String),

    #[error("program failed to link: {0}")]
    ProgramLink(String),

    #[error("could not allocate a {w}x{h} surface: {reason}", w = .viewport.width, h = .viewport.height)]
    SurfaceAllocation { viewport: Viewport, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("javascript error: {0}")]
    Js(String),
}
