//! Fisheye Core - dual-fisheye video on a sphere
//!
//! Generates a UV sphere whose texture coordinates unwarp a side-by-side
//! dual-fisheye frame, compiles the GLSL ES program that samples it, and
//! draws the sphere each frame with the external (decoder-fed) video
//! texture. Video decoding and the surface lifecycle stay with the host app.
//!
//! All GL work happens on one thread with the context current. Mesh
//! generation is plain CPU work and can happen anywhere; the resulting
//! [`SphereMesh`] is handed to [`Renderer::with_mesh`] by value.

use std::sync::Once;

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod gl;
#[cfg(any(test, feature = "headless"))]
pub mod headless;
pub mod mesh;
pub mod projection;
pub mod renderer;
pub mod shader;
pub mod texture;

#[cfg(target_os = "android")]
mod android;

pub use config::{RendererConfig, SphereConfig};
pub use error::{CoreError, Result};
pub use frame::{FrameSlot, FrameUpdate};
pub use gl::{GlApi, GlesContext};
pub use mesh::{SphereMesh, Vertex};
pub use projection::{LensProjection, TextureLayout};
pub use renderer::{DrawStats, Renderer};
pub use shader::ShaderProgram;
pub use texture::{check_error, create_external_texture, ExternalTexture};

static LOGGER: Once = Once::new();

/// Installs the platform logger. Safe to call more than once.
pub fn init_logging() {
    LOGGER.call_once(|| {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Info)
                .with_tag("FisheyeCore"),
        );

        #[cfg(not(target_os = "android"))]
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();

        log::info!("Fisheye core logging initialized");
    });
}
