//! External video texture allocation and GL error checks

use log::{debug, error};

use crate::error::{CoreError, Result};
use crate::gl::{GlApi, TEXTURE_EXTERNAL_OES};

/// Texture fed by a video decoder surface rather than CPU uploads.
///
/// The renderer samples it but never deletes it; the video collaborator
/// that allocated it owns its lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalTexture<T> {
    texture: T,
}

impl<T: Copy> ExternalTexture<T> {
    /// Wraps a texture name allocated elsewhere (e.g. by the host app)
    pub fn from_raw(texture: T) -> Self {
        Self { texture }
    }

    pub fn raw(&self) -> T {
        self.texture
    }
}

/// Surfaces the first pending GL error, tagged with `op`.
pub fn check_error<G: GlApi>(gl: &G, op: &str) -> Result<()> {
    let code = gl.get_error();
    if code == glow::NO_ERROR {
        return Ok(());
    }
    error!("{}: glError {:#06x}", op, code);
    Err(CoreError::GraphicsState { op: op.to_string(), code })
}

/// Allocates a texture on the external target with linear filtering and
/// clamp-to-edge wrapping. Either every parameter is applied or the texture
/// is deleted again.
pub fn create_external_texture<G: GlApi>(gl: &G) -> Result<ExternalTexture<G::Texture>> {
    let texture = gl.create_texture().map_err(|reason| {
        let code = gl.get_error();
        error!("glGenTextures failed: {} (glError {:#06x})", reason, code);
        CoreError::TextureCreationFailed { op: "glGenTextures".to_string(), code }
    })?;

    if let Err(err) = configure_external(gl, texture) {
        gl.delete_texture(texture);
        return Err(match err {
            CoreError::GraphicsState { op, code } => CoreError::TextureCreationFailed { op, code },
            other => other,
        });
    }

    debug!("Created external texture {:?}", texture);
    Ok(ExternalTexture { texture })
}

fn configure_external<G: GlApi>(gl: &G, texture: G::Texture) -> Result<()> {
    gl.active_texture(glow::TEXTURE0);
    check_error(gl, "glActiveTexture")?;
    gl.bind_texture(TEXTURE_EXTERNAL_OES, Some(texture));
    check_error(gl, "glBindTexture")?;
    gl.tex_parameter_f32(TEXTURE_EXTERNAL_OES, glow::TEXTURE_MIN_FILTER, glow::LINEAR as f32);
    check_error(gl, "glTexParameter TEXTURE_MIN_FILTER")?;
    gl.tex_parameter_f32(TEXTURE_EXTERNAL_OES, glow::TEXTURE_MAG_FILTER, glow::LINEAR as f32);
    check_error(gl, "glTexParameter TEXTURE_MAG_FILTER")?;
    gl.tex_parameter_i32(TEXTURE_EXTERNAL_OES, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
    check_error(gl, "glTexParameter TEXTURE_WRAP_S")?;
    gl.tex_parameter_i32(TEXTURE_EXTERNAL_OES, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
    check_error(gl, "glTexParameter TEXTURE_WRAP_T")
}

/// Releases a texture from [`create_external_texture`]. Only the owner of
/// the texture should call this.
pub fn delete_external_texture<G: GlApi>(gl: &G, texture: ExternalTexture<G::Texture>) {
    gl.delete_texture(texture.texture);
}
