//! Shader program compile/link and symbol lookup

use log::{debug, error, info};

use crate::error::{CoreError, Result, ShaderStage, SymbolKind};
use crate::gl::GlApi;
use crate::texture::check_error;

/// GLSL ES vertex shader for the sphere: MVP transform plus texture matrix
pub const DEFAULT_VERTEX_SHADER: &str = include_str!("shaders/sphere.vert");

/// GLSL ES fragment shader sampling the external video texture
pub const DEFAULT_FRAGMENT_SHADER: &str = include_str!("shaders/sphere.frag");

/// A linked GL program.
///
/// Must be released with [`ShaderProgram::release`]; dropping it leaks the
/// program name, as GL objects are only freed on the thread owning the
/// context.
pub struct ShaderProgram<G: GlApi> {
    program: G::Program,
}

impl<G: GlApi> ShaderProgram<G> {
    /// Compiles both stages and links them. The intermediate shader objects
    /// are deleted on every path; on failure nothing is left allocated.
    pub fn new(gl: &G, vertex_source: &str, fragment_source: &str) -> Result<Self> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(vertex);
                return Err(err);
            }
        };

        let linked = link(gl, vertex, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
        let program = linked?;

        info!("Linked shader program {:?}", program);
        Ok(Self { program })
    }

    pub fn handle(&self) -> G::Program {
        self.program
    }

    pub fn bind(&self, gl: &G) {
        gl.use_program(Some(self.program));
    }

    /// Location of a vertex attribute. A missing name means the shader and
    /// the code disagree, so it is reported rather than defaulted.
    pub fn attribute_location(&self, gl: &G, name: &str) -> Result<u32> {
        gl.get_attrib_location(self.program, name)
            .ok_or_else(|| not_found(SymbolKind::Attribute, name))
    }

    pub fn uniform_location(&self, gl: &G, name: &str) -> Result<G::UniformLocation> {
        gl.get_uniform_location(self.program, name)
            .ok_or_else(|| not_found(SymbolKind::Uniform, name))
    }

    /// Deletes the program. Consuming `self` rules out use after release.
    pub fn release(self, gl: &G) {
        debug!("Releasing shader program {:?}", self.program);
        gl.delete_program(self.program);
    }
}

fn not_found(kind: SymbolKind, name: &str) -> CoreError {
    error!("Could not find location for {} {}", kind, name);
    CoreError::SymbolNotFound { kind, name: name.to_string() }
}

fn compile_stage<G: GlApi>(gl: &G, stage: ShaderStage, source: &str) -> Result<G::Shader> {
    let shader_type = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };
    let shader = gl.create_shader(shader_type).map_err(|reason| {
        error!("glCreateShader type={} failed: {}", stage, reason);
        CoreError::ObjectCreation { what: "shader", reason }
    })?;
    if let Err(err) = check_error(gl, &format!("glCreateShader type={stage}")) {
        gl.delete_shader(shader);
        return Err(err);
    }

    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        error!("Could not compile {} shader: {}", stage, log);
        gl.delete_shader(shader);
        return Err(CoreError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

fn link<G: GlApi>(gl: &G, vertex: G::Shader, fragment: G::Shader) -> Result<G::Program> {
    let program = gl.create_program().map_err(|reason| {
        error!("Could not create program: {}", reason);
        CoreError::ObjectCreation { what: "program", reason }
    })?;

    let linked = (|| -> Result<()> {
        check_error(gl, "glCreateProgram")?;
        gl.attach_shader(program, vertex);
        check_error(gl, "glAttachShader")?;
        gl.attach_shader(program, fragment);
        check_error(gl, "glAttachShader")?;
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            error!("Could not link program: {}", log);
            return Err(CoreError::ShaderLink { log });
        }
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        Ok(())
    })();

    match linked {
        Ok(()) => Ok(program),
        Err(err) => {
            gl.delete_program(program);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessGl;

    fn default_program(gl: &HeadlessGl) -> ShaderProgram<HeadlessGl> {
        ShaderProgram::new(gl, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).unwrap()
    }

    #[test]
    fn default_shaders_link_and_resolve_symbols() {
        let gl = HeadlessGl::new();
        let program = default_program(&gl);
        assert!(program.attribute_location(&gl, "aPosition").is_ok());
        assert!(program.attribute_location(&gl, "aTextureCoord").is_ok());
        for name in ["uMVPMatrix", "uTextureMatrix", "sTexture"] {
            assert!(program.uniform_location(&gl, name).is_ok(), "{name}");
        }
        // intermediate shader objects are gone once linked
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let gl = HeadlessGl::new();
        let program = default_program(&gl);
        let err = program.uniform_location(&gl, "uNotThere").unwrap_err();
        assert!(matches!(
            err,
            CoreError::SymbolNotFound { kind: SymbolKind::Uniform, ref name } if name == "uNotThere"
        ));
        let err = program.attribute_location(&gl, "aNormal").unwrap_err();
        assert!(matches!(err, CoreError::SymbolNotFound { kind: SymbolKind::Attribute, .. }));
    }

    #[test]
    fn malformed_fragment_shader_leaves_nothing_behind() {
        let gl = HeadlessGl::new();
        let err = ShaderProgram::new(&gl, DEFAULT_VERTEX_SHADER, "void main() { gl_FragColor = vec4(1.0);")
            .err()
            .unwrap();
        match err {
            CoreError::ShaderCompile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn link_failure_deletes_program() {
        let gl = HeadlessGl::new();
        gl.fail_next_link();
        let err = ShaderProgram::new(&gl, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).err().unwrap();
        assert!(matches!(err, CoreError::ShaderLink { .. }));
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn attach_error_is_surfaced_with_operation() {
        let gl = HeadlessGl::new();
        gl.inject_error("attach_shader", glow::INVALID_OPERATION);
        let err = ShaderProgram::new(&gl, DEFAULT_VERTEX_SHADER, DEFAULT_FRAGMENT_SHADER).err().unwrap();
        assert!(matches!(err, CoreError::GraphicsState { ref op, code } if op == "glAttachShader" && code == glow::INVALID_OPERATION));
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn release_deletes_program() {
        let gl = HeadlessGl::new();
        let program = default_program(&gl);
        let handle = program.handle();
        program.release(&gl);
        assert!(!gl.is_program(handle));
        // queries against the dead name fail at the GL level too
        assert_eq!(gl.get_attrib_location(handle, "aPosition"), None);
        assert_eq!(gl.get_error(), glow::INVALID_VALUE);
    }
}
