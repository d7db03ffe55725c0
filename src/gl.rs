//! The slice of OpenGL ES the core talks to
//!
//! [`GlApi`] covers exactly the calls issued by the texture helper, the
//! shader program and the renderer. [`GlesContext`] forwards them to a real
//! context through `glow`; `HeadlessGl` implements them in software.

use std::fmt::Debug;
use std::marker::PhantomData;

use glow::HasContext;

/// `GL_TEXTURE_EXTERNAL_OES` from `OES_EGL_image_external`
pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

pub trait GlApi {
    type Shader: Copy + Debug + PartialEq;
    type Program: Copy + Debug + PartialEq;
    type Texture: Copy + Debug + PartialEq;
    type Buffer: Copy + Debug + PartialEq;
    type UniformLocation: Clone + Debug;

    fn get_error(&self) -> u32;

    // Shaders and programs
    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn get_program_link_status(&self, program: Self::Program) -> bool;
    fn get_program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);
    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn get_uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn uniform_matrix_4(&self, location: &Self::UniformLocation, value: &[f32; 16]);
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);

    // Textures
    fn create_texture(&self) -> Result<Self::Texture, String>;
    fn delete_texture(&self, texture: Self::Texture);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);

    // Buffers and drawing
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);
    fn draw_elements_u16(&self, mode: u32, count: i32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, color: [f32; 4]);
    fn clear(&self, mask: u32);
}

/// A real GLES context, reached through `glow`
///
/// Not `Send`: GL calls must stay on the thread the context is current on.
pub struct GlesContext {
    gl: glow::Context,
    _not_send: PhantomData<*const ()>,
}

impl GlesContext {
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as the
    /// returned value is used.
    pub unsafe fn from_glow(gl: glow::Context) -> Self {
        Self { gl, _not_send: PhantomData }
    }

    /// Loads GL entry points through `loader`.
    ///
    /// # Safety
    ///
    /// A context must be current on the calling thread, and stay current for
    /// as long as the returned value is used. `loader` must return valid
    /// function pointers for that context.
    pub unsafe fn from_loader_function<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        Self::from_glow(glow::Context::from_loader_function(loader))
    }

    pub fn glow(&self) -> &glow::Context {
        &self.gl
    }

    /// Logs vendor/renderer/version strings of the current context
    pub fn log_driver_info(&self) {
        unsafe {
            log::info!(
                "GL vendor={} renderer={} version={} glsl={}",
                self.gl.get_parameter_string(glow::VENDOR),
                self.gl.get_parameter_string(glow::RENDERER),
                self.gl.get_parameter_string(glow::VERSION),
                self.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
            );
        }
    }
}

// Safety for every call below: the constructors require the context to be
// current on this thread, and `GlesContext` cannot leave it.
impl GlApi for GlesContext {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Texture = glow::Texture;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(shader_type) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn get_program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn get_program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn get_uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_matrix_4(&self, location: &Self::UniformLocation, value: &[f32; 16]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, value) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), value) }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        unsafe { self.gl.bind_texture(target, texture) }
    }

    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32) {
        unsafe { self.gl.tex_parameter_f32(target, parameter, value) }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, parameter, value) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target, buffer) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(target, data, usage) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe { self.gl.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset) }
    }

    fn draw_elements_u16(&self, mode: u32, count: i32) {
        unsafe { self.gl.draw_elements(mode, count, glow::UNSIGNED_SHORT, 0) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, color: [f32; 4]) {
        unsafe { self.gl.clear_color(color[0], color[1], color[2], color[3]) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }
}
