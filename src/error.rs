//! Error types for mesh construction and the GL pipeline

use thiserror::Error;

/// Which shader stage a compile error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Kind of named program symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Attribute,
    Uniform,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Attribute => write!(f, "attribute"),
            SymbolKind::Uniform => write!(f, "uniform"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Could not compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("Could not link program: {log}")]
    ShaderLink { log: String },
    #[error("Could not find location for {kind} {name}")]
    SymbolNotFound { kind: SymbolKind, name: String },
    #[error("Failed to create external texture ({op}): glError {code:#06x}")]
    TextureCreationFailed { op: String, code: u32 },
    #[error("{op}: glError {code:#06x}")]
    GraphicsState { op: String, code: u32 },
    #[error("Could not create {what}: {reason}")]
    ObjectCreation { what: &'static str, reason: String },
}

impl CoreError {
    /// Raw GL error code, for the variants that carry one
    pub fn gl_code(&self) -> Option<u32> {
        match self {
            CoreError::TextureCreationFailed { code, .. } | CoreError::GraphicsState { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_codes_render_as_hex() {
        let err = CoreError::GraphicsState { op: "glDrawElements".into(), code: 0x0502 };
        assert_eq!(err.to_string(), "glDrawElements: glError 0x0502");
        assert_eq!(err.gl_code(), Some(0x0502));
    }

    #[test]
    fn non_gl_errors_have_no_code() {
        let err = CoreError::SymbolNotFound { kind: SymbolKind::Uniform, name: "uMVPMatrix".into() };
        assert_eq!(err.to_string(), "Could not find location for uniform uMVPMatrix");
        assert_eq!(err.gl_code(), None);
    }
}
