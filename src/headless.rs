//! Software stand-in for a GLES context
//!
//! `HeadlessGl` keeps the object bookkeeping of a real driver (names, bind
//! points, the sticky error flag) without touching a GPU. Shader "compiles"
//! check that braces balance and a `main` exists, and linking reflects
//! `attribute`/`uniform` declarations so location queries behave like the
//! real thing. Draw calls are recorded for inspection.
//!
//! Clones share one state, so a test can hand a clone to the renderer and
//! keep another to look at afterwards.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::trace;

use crate::gl::{GlApi, TEXTURE_EXTERNAL_OES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessShader(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessProgram(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessTexture(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessBuffer(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessUniform {
    program: u32,
    name: String,
}

/// One recorded `glDrawElements`
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mode: u32,
    pub program: HeadlessProgram,
    pub texture: Option<HeadlessTexture>,
    pub indices: Vec<u16>,
}

/// Object kinds whose creation can be refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Shader,
    Program,
    Texture,
    Buffer,
}

#[derive(Debug)]
struct ShaderObject {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct TextureObject {
    target: Option<u32>,
    parameters: HashMap<u32, f32>,
}

#[derive(Default)]
struct State {
    next_name: u32,
    error: u32,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    textures: HashMap<u32, TextureObject>,
    buffers: HashMap<u32, Vec<u8>>,
    active_unit: u32,
    bound_textures: HashMap<(u32, u32), u32>,
    bound_buffers: HashMap<u32, u32>,
    current_program: Option<u32>,
    enabled_attributes: HashSet<u32>,
    uniform_values: HashMap<(u32, String), Vec<f32>>,
    viewport: [i32; 4],
    clear_color: [f32; 4],
    draws: Vec<DrawCall>,
    // one-shot faults
    injected_errors: HashMap<&'static str, u32>,
    refused: HashSet<ObjectKind>,
    fail_next_link: bool,
}

impl State {
    fn name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    fn record_error(&mut self, code: u32) {
        // GL keeps the first error until it is read
        if self.error == glow::NO_ERROR {
            self.error = code;
        }
    }

    fn enter(&mut self, call: &'static str) {
        trace!("headless gl: {}", call);
        if let Some(code) = self.injected_errors.remove(call) {
            self.record_error(code);
        }
    }

    fn refuse(&mut self, kind: ObjectKind) -> Result<(), String> {
        if self.refused.remove(&kind) {
            Err(format!("{kind:?} creation refused"))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
pub struct HeadlessGl {
    state: Rc<RefCell<State>>,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call named `call` (a [`GlApi`] method name) raise `code`.
    pub fn inject_error(&self, call: &'static str, code: u32) {
        self.state.borrow_mut().injected_errors.insert(call, code);
    }

    /// Makes the next `create_*` of `kind` fail.
    pub fn refuse_next(&self, kind: ObjectKind) {
        self.state.borrow_mut().refused.insert(kind);
    }

    /// Makes the next link fail even if both stages compiled.
    pub fn fail_next_link(&self) {
        self.state.borrow_mut().fail_next_link = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn is_program(&self, program: HeadlessProgram) -> bool {
        self.state.borrow().programs.contains_key(&program.0)
    }

    pub fn texture_target(&self, texture: HeadlessTexture) -> Option<u32> {
        self.state.borrow().textures.get(&texture.0).and_then(|t| t.target)
    }

    pub fn texture_parameter(&self, texture: HeadlessTexture, parameter: u32) -> Option<f32> {
        self.state
            .borrow()
            .textures
            .get(&texture.0)
            .and_then(|t| t.parameters.get(&parameter).copied())
    }

    pub fn uniform_value(&self, program: HeadlessProgram, name: &str) -> Option<Vec<f32>> {
        self.state.borrow().uniform_values.get(&(program.0, name.to_string())).cloned()
    }

    pub fn buffer_len(&self, buffer: HeadlessBuffer) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer.0).map(Vec::len)
    }

    pub fn bound_buffer(&self, target: u32) -> Option<HeadlessBuffer> {
        self.state.borrow().bound_buffers.get(&target).map(|name| HeadlessBuffer(*name))
    }

    pub fn current_program(&self) -> Option<HeadlessProgram> {
        self.state.borrow().current_program.map(HeadlessProgram)
    }

    pub fn enabled_attributes(&self) -> usize {
        self.state.borrow().enabled_attributes.len()
    }

    pub fn viewport_rect(&self) -> [i32; 4] {
        self.state.borrow().viewport
    }

    pub fn current_clear_color(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn take_draws(&self) -> Vec<DrawCall> {
        std::mem::take(&mut self.state.borrow_mut().draws)
    }
}

/// Syntax check standing in for the GLSL compiler
fn check_source(source: &str) -> Result<(), String> {
    let mut depth = 0i32;
    for (line_no, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("ERROR: 0:{}: '}}' : syntax error", line_no + 1));
            }
        }
    }
    if depth != 0 {
        return Err("ERROR: 0:0: unexpected end of file".to_string());
    }
    if !source.contains("void main") {
        return Err("ERROR: 0:0: missing main() function".to_string());
    }
    Ok(())
}

/// Collects names declared with `keyword` (ignoring precision qualifiers)
fn declarations(source: &str, keywords: &[&str]) -> Vec<String> {
    let code: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    code.split(|c| c == ';' || c == '{' || c == '}')
        .filter_map(|statement| {
            let words: Vec<&str> = statement.split_whitespace().collect();
            match (words.first(), words.last()) {
                (Some(first), Some(last)) if words.len() >= 3 && keywords.contains(first) => {
                    Some(last.split('[').next().unwrap_or(last).to_string())
                }
                _ => None,
            }
        })
        .collect()
}

impl GlApi for HeadlessGl {
    type Shader = HeadlessShader;
    type Program = HeadlessProgram;
    type Texture = HeadlessTexture;
    type Buffer = HeadlessBuffer;
    type UniformLocation = HeadlessUniform;

    fn get_error(&self) -> u32 {
        std::mem::replace(&mut self.state.borrow_mut().error, glow::NO_ERROR)
    }

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        let mut st = self.state.borrow_mut();
        st.enter("create_shader");
        st.refuse(ObjectKind::Shader)?;
        if shader_type != glow::VERTEX_SHADER && shader_type != glow::FRAGMENT_SHADER {
            st.record_error(glow::INVALID_ENUM);
            return Err(format!("unknown shader type {shader_type:#x}"));
        }
        let name = st.name();
        st.shaders.insert(
            name,
            ShaderObject { kind: shader_type, source: String::new(), compiled: false, log: String::new() },
        );
        Ok(HeadlessShader(name))
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        let mut st = self.state.borrow_mut();
        st.enter("shader_source");
        match st.shaders.get_mut(&shader.0) {
            Some(obj) => obj.source = source.to_string(),
            None => st.record_error(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        let mut st = self.state.borrow_mut();
        st.enter("compile_shader");
        match st.shaders.get_mut(&shader.0) {
            Some(obj) => match check_source(&obj.source) {
                Ok(()) => {
                    obj.compiled = true;
                    obj.log.clear();
                }
                Err(log) => {
                    obj.compiled = false;
                    obj.log = log;
                }
            },
            None => st.record_error(glow::INVALID_VALUE),
        }
    }

    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.state.borrow().shaders.get(&shader.0).map_or(false, |obj| obj.compiled)
    }

    fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        self.state.borrow().shaders.get(&shader.0).map(|obj| obj.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: Self::Shader) {
        let mut st = self.state.borrow_mut();
        st.enter("delete_shader");
        // attached shaders are flagged for deletion in GL; here they simply go
        st.shaders.remove(&shader.0);
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        let mut st = self.state.borrow_mut();
        st.enter("create_program");
        st.refuse(ObjectKind::Program)?;
        let name = st.name();
        st.programs.insert(name, ProgramObject::default());
        Ok(HeadlessProgram(name))
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        let mut st = self.state.borrow_mut();
        st.enter("attach_shader");
        if !st.shaders.contains_key(&shader.0) {
            st.record_error(glow::INVALID_VALUE);
            return;
        }
        match st.programs.get_mut(&program.0) {
            Some(obj) if !obj.attached.contains(&shader.0) => obj.attached.push(shader.0),
            Some(_) => st.record_error(glow::INVALID_OPERATION),
            None => st.record_error(glow::INVALID_VALUE),
        }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        let mut st = self.state.borrow_mut();
        st.enter("detach_shader");
        match st.programs.get_mut(&program.0) {
            Some(obj) => obj.attached.retain(|s| *s != shader.0),
            None => st.record_error(glow::INVALID_VALUE),
        }
    }

    fn link_program(&self, program: Self::Program) {
        let mut st = self.state.borrow_mut();
        st.enter("link_program");
        if !st.programs.contains_key(&program.0) {
            st.record_error(glow::INVALID_VALUE);
            return;
        }

        let obj = &st.programs[&program.0];
        let stage = |kind: u32| {
            obj.attached
                .iter()
                .filter_map(|s| st.shaders.get(s))
                .find(|s| s.kind == kind && s.compiled)
                .map(|s| s.source.clone())
        };
        let vertex = stage(glow::VERTEX_SHADER);
        let fragment = stage(glow::FRAGMENT_SHADER);
        let forced = std::mem::take(&mut st.fail_next_link);

        let result = match (vertex, fragment) {
            _ if forced => Err("ERROR: Linking failed".to_string()),
            (Some(vs), Some(fs)) => {
                let attributes = declarations(&vs, &["attribute", "in"]);
                let mut uniforms = declarations(&vs, &["uniform"]);
                for name in declarations(&fs, &["uniform"]) {
                    if !uniforms.contains(&name) {
                        uniforms.push(name);
                    }
                }
                Ok((attributes, uniforms))
            }
            _ => Err("ERROR: program needs a compiled vertex and fragment shader".to_string()),
        };

        if let Some(obj) = st.programs.get_mut(&program.0) {
            match result {
                Ok((attributes, uniforms)) => {
                    obj.linked = true;
                    obj.log.clear();
                    obj.attributes = attributes;
                    obj.uniforms = uniforms;
                }
                Err(log) => {
                    obj.linked = false;
                    obj.log = log;
                    obj.attributes.clear();
                    obj.uniforms.clear();
                }
            }
        }
    }

    fn get_program_link_status(&self, program: Self::Program) -> bool {
        self.state.borrow().programs.get(&program.0).map_or(false, |obj| obj.linked)
    }

    fn get_program_info_log(&self, program: Self::Program) -> String {
        self.state.borrow().programs.get(&program.0).map(|obj| obj.log.clone()).unwrap_or_default()
    }

    fn delete_program(&self, program: Self::Program) {
        let mut st = self.state.borrow_mut();
        st.enter("delete_program");
        st.programs.remove(&program.0);
        if st.current_program == Some(program.0) {
            st.current_program = None;
        }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        let mut st = self.state.borrow_mut();
        st.enter("use_program");
        match program {
            Some(p) if st.programs.get(&p.0).map_or(false, |obj| obj.linked) => st.current_program = Some(p.0),
            Some(_) => st.record_error(glow::INVALID_OPERATION),
            None => st.current_program = None,
        }
    }

    fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        let mut st = self.state.borrow_mut();
        st.enter("get_attrib_location");
        let lookup = st
            .programs
            .get(&program.0)
            .map(|obj| (obj.linked, obj.attributes.iter().position(|a| a == name)));
        match lookup {
            Some((true, location)) => location.map(|i| i as u32),
            Some((false, _)) => {
                st.record_error(glow::INVALID_OPERATION);
                None
            }
            None => {
                st.record_error(glow::INVALID_VALUE);
                None
            }
        }
    }

    fn get_uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        let mut st = self.state.borrow_mut();
        st.enter("get_uniform_location");
        let lookup = st.programs.get(&program.0).map(|obj| (obj.linked, obj.uniforms.iter().any(|u| u == name)));
        let found = match lookup {
            Some((true, found)) => found,
            Some((false, _)) => {
                st.record_error(glow::INVALID_OPERATION);
                false
            }
            None => {
                st.record_error(glow::INVALID_VALUE);
                false
            }
        };
        found.then(|| HeadlessUniform { program: program.0, name: name.to_string() })
    }

    fn uniform_matrix_4(&self, location: &Self::UniformLocation, value: &[f32; 16]) {
        let mut st = self.state.borrow_mut();
        st.enter("uniform_matrix_4");
        if st.current_program != Some(location.program) {
            st.record_error(glow::INVALID_OPERATION);
            return;
        }
        st.uniform_values.insert((location.program, location.name.clone()), value.to_vec());
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        let mut st = self.state.borrow_mut();
        st.enter("uniform_1_i32");
        if st.current_program != Some(location.program) {
            st.record_error(glow::INVALID_OPERATION);
            return;
        }
        st.uniform_values.insert((location.program, location.name.clone()), vec![value as f32]);
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        let mut st = self.state.borrow_mut();
        st.enter("create_texture");
        st.refuse(ObjectKind::Texture)?;
        let name = st.name();
        st.textures.insert(name, TextureObject::default());
        Ok(HeadlessTexture(name))
    }

    fn delete_texture(&self, texture: Self::Texture) {
        let mut st = self.state.borrow_mut();
        st.enter("delete_texture");
        st.textures.remove(&texture.0);
        st.bound_textures.retain(|_, t| *t != texture.0);
    }

    fn active_texture(&self, unit: u32) {
        let mut st = self.state.borrow_mut();
        st.enter("active_texture");
        if unit < glow::TEXTURE0 {
            st.record_error(glow::INVALID_ENUM);
            return;
        }
        st.active_unit = unit - glow::TEXTURE0;
    }

    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        let mut st = self.state.borrow_mut();
        st.enter("bind_texture");
        let unit = st.active_unit;
        let Some(texture) = texture else {
            st.bound_textures.remove(&(unit, target));
            return;
        };
        match st.textures.get(&texture.0).map(|obj| obj.target) {
            Some(Some(bound)) if bound != target => st.record_error(glow::INVALID_OPERATION),
            Some(_) => {
                if let Some(obj) = st.textures.get_mut(&texture.0) {
                    obj.target = Some(target);
                }
                st.bound_textures.insert((unit, target), texture.0);
            }
            None => st.record_error(glow::INVALID_VALUE),
        }
    }

    fn tex_parameter_f32(&self, target: u32, parameter: u32, value: f32) {
        let mut st = self.state.borrow_mut();
        st.enter("tex_parameter_f32");
        let key = (st.active_unit, target);
        match st.bound_textures.get(&key).copied() {
            Some(name) => {
                if let Some(obj) = st.textures.get_mut(&name) {
                    obj.parameters.insert(parameter, value);
                }
            }
            None => st.record_error(glow::INVALID_OPERATION),
        }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        let mut st = self.state.borrow_mut();
        st.enter("tex_parameter_i32");
        let key = (st.active_unit, target);
        match st.bound_textures.get(&key).copied() {
            Some(name) => {
                if let Some(obj) = st.textures.get_mut(&name) {
                    obj.parameters.insert(parameter, value as f32);
                }
            }
            None => st.record_error(glow::INVALID_OPERATION),
        }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        let mut st = self.state.borrow_mut();
        st.enter("create_buffer");
        st.refuse(ObjectKind::Buffer)?;
        let name = st.name();
        st.buffers.insert(name, Vec::new());
        Ok(HeadlessBuffer(name))
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        let mut st = self.state.borrow_mut();
        st.enter("delete_buffer");
        st.buffers.remove(&buffer.0);
        st.bound_buffers.retain(|_, b| *b != buffer.0);
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        let mut st = self.state.borrow_mut();
        st.enter("bind_buffer");
        match buffer {
            Some(b) if st.buffers.contains_key(&b.0) => {
                st.bound_buffers.insert(target, b.0);
            }
            Some(_) => st.record_error(glow::INVALID_VALUE),
            None => {
                st.bound_buffers.remove(&target);
            }
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
        let mut st = self.state.borrow_mut();
        st.enter("buffer_data");
        match st.bound_buffers.get(&target).copied() {
            Some(name) => {
                st.buffers.insert(name, data.to_vec());
            }
            None => st.record_error(glow::INVALID_OPERATION),
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut st = self.state.borrow_mut();
        st.enter("enable_vertex_attrib_array");
        st.enabled_attributes.insert(index);
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        let mut st = self.state.borrow_mut();
        st.enter("disable_vertex_attrib_array");
        st.enabled_attributes.remove(&index);
    }

    fn vertex_attrib_pointer_f32(&self, _index: u32, size: i32, stride: i32, offset: i32) {
        let mut st = self.state.borrow_mut();
        st.enter("vertex_attrib_pointer_f32");
        if !(1..=4).contains(&size) || stride < 0 || offset < 0 || !st.bound_buffers.contains_key(&glow::ARRAY_BUFFER) {
            st.record_error(glow::INVALID_VALUE);
        }
    }

    fn draw_elements_u16(&self, mode: u32, count: i32) {
        let mut st = self.state.borrow_mut();
        st.enter("draw_elements_u16");
        let Some(program) = st.current_program else {
            st.record_error(glow::INVALID_OPERATION);
            return;
        };
        let indices: Option<Vec<u16>> = st
            .bound_buffers
            .get(&glow::ELEMENT_ARRAY_BUFFER)
            .and_then(|name| st.buffers.get(name))
            .map(|data| data.chunks_exact(2).map(|b| u16::from_ne_bytes([b[0], b[1]])).collect());
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        match indices {
            Some(indices) if count <= indices.len() => {
                let texture = st
                    .bound_textures
                    .get(&(0, TEXTURE_EXTERNAL_OES))
                    .map(|name| HeadlessTexture(*name));
                st.draws.push(DrawCall {
                    mode,
                    program: HeadlessProgram(program),
                    texture,
                    indices: indices[..count].to_vec(),
                });
            }
            _ => st.record_error(glow::INVALID_OPERATION),
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut st = self.state.borrow_mut();
        st.enter("viewport");
        if width < 0 || height < 0 {
            st.record_error(glow::INVALID_VALUE);
            return;
        }
        st.viewport = [x, y, width, height];
    }

    fn clear_color(&self, color: [f32; 4]) {
        let mut st = self.state.borrow_mut();
        st.enter("clear_color");
        st.clear_color = color;
    }

    fn clear(&self, _mask: u32) {
        self.state.borrow_mut().enter("clear");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "uniform mat4 uMVP;\nattribute vec4 aPosition;\nattribute vec2 aUv;\nvoid main() {\n  gl_Position = uMVP * aPosition;\n}\n";
    const FS: &str = "precision mediump float;\nuniform sampler2D sTex;\nvoid main() {\n  gl_FragColor = vec4(1.0);\n}\n";

    #[test]
    fn errors_are_sticky_until_read() {
        let gl = HeadlessGl::new();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(HeadlessBuffer(99)));
        gl.viewport(0, 0, -1, 1);
        assert_eq!(gl.get_error(), glow::INVALID_VALUE);
        assert_eq!(gl.get_error(), glow::NO_ERROR);
    }

    #[test]
    fn unbalanced_source_fails_to_compile() {
        let gl = HeadlessGl::new();
        let shader = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        gl.shader_source(shader, "void main() {");
        gl.compile_shader(shader);
        assert!(!gl.get_shader_compile_status(shader));
        assert!(gl.get_shader_info_log(shader).contains("end of file"));
    }

    #[test]
    fn link_reflects_declarations() {
        let gl = HeadlessGl::new();
        let program = gl.create_program().unwrap();
        for (kind, src) in [(glow::VERTEX_SHADER, VS), (glow::FRAGMENT_SHADER, FS)] {
            let shader = gl.create_shader(kind).unwrap();
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            gl.attach_shader(program, shader);
        }
        gl.link_program(program);
        assert!(gl.get_program_link_status(program));
        assert_eq!(gl.get_attrib_location(program, "aPosition"), Some(0));
        assert_eq!(gl.get_attrib_location(program, "aUv"), Some(1));
        assert!(gl.get_uniform_location(program, "sTex").is_some());
        assert!(gl.get_uniform_location(program, "missing").is_none());
        assert_eq!(gl.get_error(), glow::NO_ERROR);
    }

    #[test]
    fn refused_creation_is_one_shot() {
        let gl = HeadlessGl::new();
        gl.refuse_next(ObjectKind::Texture);
        assert!(gl.create_texture().is_err());
        assert!(gl.create_texture().is_ok());
        assert_eq!(gl.live_textures(), 1);
    }

    #[test]
    fn clones_share_state() {
        let gl = HeadlessGl::new();
        let other = gl.clone();
        other.create_buffer().unwrap();
        assert_eq!(gl.live_buffers(), 1);
    }
}
