//! JNI entry points for the Android host
//!
//! The Java side owns the GL thread and the SurfaceTexture the video player
//! decodes into. Every call below must come from that GL thread, with its
//! EGL context current.

use std::ffi::{c_void, CString};
use std::num::NonZeroU32;

use glam::{Mat4, Quat};
use jni::objects::{JClass, JFloatArray, JString};
use jni::sys::{jfloat, jint, jlong};
use jni::JNIEnv;
use log::{error, info};

use crate::config::{RendererConfig, SphereConfig};
use crate::error::{CoreError, Result};
use crate::gl::GlesContext;
use crate::renderer::Renderer;
use crate::texture::{self, ExternalTexture};

struct NativeSession {
    renderer: Renderer<GlesContext>,
}

/// Resolves GL entry points from the linked GLESv2 library
unsafe fn load_gles() -> GlesContext {
    GlesContext::from_loader_function(|name| match CString::new(name) {
        Ok(symbol) => libc::dlsym(libc::RTLD_DEFAULT, symbol.as_ptr()) as *const c_void,
        Err(_) => std::ptr::null(),
    })
}

fn throw(env: &mut JNIEnv, err: &CoreError) {
    error!("Native renderer error: {}", err);
    // a JNI call that failed may already have raised its own exception
    if env.exception_check().unwrap_or(true) {
        return;
    }
    let _ = env.throw_new("java/lang/RuntimeException", err.to_string());
}

fn optional_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(Into::into)
}

const MATRIX_LEN: usize = 16;

fn check_matrix_len(what: &str, len: usize) -> Result<()> {
    if len < MATRIX_LEN {
        return Err(CoreError::InvalidConfiguration(format!(
            "{what} needs {MATRIX_LEN} floats, got {len}"
        )));
    }
    Ok(())
}

/// `None` for a null array; a short array or failed copy is an error
fn read_matrix(env: &mut JNIEnv, array: &JFloatArray, what: &str) -> Result<Option<Mat4>> {
    if array.is_null() {
        return Ok(None);
    }
    let jni_failure = |err: jni::errors::Error| CoreError::InvalidConfiguration(format!("{what}: {err}"));
    let len = env.get_array_length(array).map_err(jni_failure)?;
    check_matrix_len(what, usize::try_from(len).unwrap_or(0))?;

    let mut values = [0.0 as jfloat; MATRIX_LEN];
    env.get_float_array_region(array, 0, &mut values).map_err(jni_failure)?;
    Ok(Some(Mat4::from_cols_array(&values)))
}

fn external_texture(id: jint) -> Result<ExternalTexture<glow::Texture>> {
    u32::try_from(id)
        .ok()
        .and_then(NonZeroU32::new)
        .map(|name| ExternalTexture::from_raw(glow::NativeTexture(name)))
        .ok_or_else(|| CoreError::InvalidConfiguration(format!("invalid texture id {id}")))
}

unsafe fn session<'a>(handle: jlong) -> Option<&'a mut NativeSession> {
    (handle as *mut NativeSession).as_mut()
}

#[no_mangle]
pub unsafe extern "C" fn Java_com_example_fisheye_NativeSphereRenderer_nativeCreate(
    mut env: JNIEnv,
    _class: JClass,
    slices: jint,
    radius: jfloat,
    num_index_buffers: jint,
    vertex_shader: JString,
    fragment_shader: JString,
) -> jlong {
    crate::init_logging();

    let mut config = RendererConfig::default().with_sphere(
        SphereConfig::default()
            .with_slices(usize::try_from(slices).unwrap_or(0))
            .with_radius(radius)
            .with_index_buffers(usize::try_from(num_index_buffers).unwrap_or(0)),
    );
    if let Some(source) = optional_string(&mut env, &vertex_shader) {
        config.vertex_shader = source;
    }
    if let Some(source) = optional_string(&mut env, &fragment_shader) {
        config.fragment_shader = source;
    }

    let gl = load_gles();
    gl.log_driver_info();
    match Renderer::new(gl, &config) {
        Ok(renderer) => {
            info!("Native renderer created");
            Box::into_raw(Box::new(NativeSession { renderer })) as jlong
        }
        Err(err) => {
            throw(&mut env, &err);
            0
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn Java_com_example_fisheye_NativeSphereRenderer_nativeCreateExternalTexture(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jint {
    let Some(session) = session(handle) else {
        return 0;
    };
    match texture::create_external_texture(session.renderer.gl()) {
        Ok(texture) => texture.raw().0.get() as jint,
        Err(err) => {
            throw(&mut env, &err);
            0
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn Java_com_example_fisheye_NativeSphereRenderer_nativeDeleteExternalTexture(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    texture_id: jint,
) {
    if let (Some(session), Ok(texture)) = (session(handle), external_texture(texture_id)) {
        texture::delete_external_texture(session.renderer.gl(), texture);
    }
}

#[no_mangle]
pub unsafe extern "C" fn Java_com_example_fisheye_NativeSphereRenderer_nativeResize(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    width: jint,
    height: jint,
) {
    let Some(session) = session(handle) else {
        return;
    };
    let width = u32::try_from(width).unwrap_or(0);
    let height = u32::try_from(height).unwrap_or(0);
    if let Err(err) = session.renderer.resize(width, height) {
        throw(&mut env, &err);
    }
}

/// `view_projection` may be null, in which case the default camera looking
/// down -z is used.
#[no_mangle]
pub unsafe extern "C" fn Java_com_example_fisheye_NativeSphereRenderer_nativeDrawFrame(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    texture_id: jint,
    texture_matrix: JFloatArray,
    view_projection: JFloatArray,
) {
    let Some(session) = session(handle) else {
        return;
    };
    let texture_matrix = match read_matrix(&mut env, &texture_matrix, "texture matrix") {
        Ok(matrix) => matrix.unwrap_or(Mat4::IDENTITY),
        Err(err) => return throw(&mut env, &err),
    };
    let view_projection = match read_matrix(&mut env, &view_projection, "view-projection matrix") {
        Ok(matrix) => matrix.unwrap_or_else(|| session.renderer.view_projection(Quat::IDENTITY)),
        Err(err) => return throw(&mut env, &err),
    };

    let result = external_texture(texture_id)
        .and_then(|texture| session.renderer.draw_frame(&texture, &texture_matrix, &view_projection));
    if let Err(err) = result {
        throw(&mut env, &err);
    }
}

#[no_mangle]
pub unsafe extern "C" fn Java_com_example_fisheye_NativeSphereRenderer_nativeRelease(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    let session = Box::from_raw(handle as *mut NativeSession);
    drop(session.renderer.release());
}
