//! Sphere renderer
//!
//! Owns the compiled program and the static sphere buffers, and each frame
//! draws the mesh textured with the current external video texture.

use glam::{Mat4, Quat};
use log::{debug, info, trace};

use crate::camera;
use crate::config::RendererConfig;
use crate::error::{CoreError, Result};
use crate::gl::{GlApi, TEXTURE_EXTERNAL_OES};
use crate::mesh::{SphereMesh, Vertex};
use crate::shader::ShaderProgram;
use crate::texture::{check_error, ExternalTexture};

// Shader interface of the bundled (and any replacement) shaders
const POSITION_ATTRIBUTE: &str = "aPosition";
const TEXTURE_COORD_ATTRIBUTE: &str = "aTextureCoord";
const MVP_UNIFORM: &str = "uMVPMatrix";
const TEXTURE_MATRIX_UNIFORM: &str = "uTextureMatrix";
const SAMPLER_UNIFORM: &str = "sTexture";

/// What one `draw_frame` submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: usize,
    pub indices: usize,
}

struct Locations<G: GlApi> {
    position: u32,
    texture_coord: u32,
    mvp: G::UniformLocation,
    texture_matrix: G::UniformLocation,
    sampler: G::UniformLocation,
}

struct IndexDraw<B> {
    buffer: B,
    count: usize,
}

struct GpuMesh<B> {
    vertex_buffer: B,
    // empty index buffers are not uploaded
    index_draws: Vec<IndexDraw<B>>,
}

pub struct Renderer<G: GlApi> {
    gl: G,
    program: ShaderProgram<G>,
    locations: Locations<G>,
    mesh: SphereMesh,
    gpu: GpuMesh<G::Buffer>,
    size: (u32, u32),
    clear_color: [f32; 4],
}

impl<G: GlApi> Renderer<G> {
    /// Builds the mesh from `config.sphere`, then sets up the GPU side.
    pub fn new(gl: G, config: &RendererConfig) -> Result<Self> {
        let mesh = SphereMesh::new(config.sphere)?;
        Self::with_mesh(gl, mesh, config)
    }

    /// Sets up the GPU side for a mesh generated elsewhere, e.g. off the
    /// render thread. `config.sphere` is not consulted.
    pub fn with_mesh(gl: G, mesh: SphereMesh, config: &RendererConfig) -> Result<Self> {
        let program = ShaderProgram::new(&gl, &config.vertex_shader, &config.fragment_shader)?;

        let locations = match resolve_locations(&gl, &program) {
            Ok(locations) => locations,
            Err(err) => {
                program.release(&gl);
                return Err(err);
            }
        };

        let gpu = match upload_mesh(&gl, &mesh) {
            Ok(gpu) => gpu,
            Err(err) => {
                program.release(&gl);
                return Err(err);
            }
        };

        info!(
            "Renderer initialized: {} vertices, {} indices in {} draw calls",
            mesh.vertices().len(),
            mesh.total_indices(),
            gpu.index_draws.len()
        );

        Ok(Self {
            gl,
            program,
            locations,
            mesh,
            gpu,
            size: (0, 0),
            clear_color: config.clear_color,
        })
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn program(&self) -> &ShaderProgram<G> {
        &self.program
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Called when the surface changes size. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width > 0 && height > 0 {
            let w = i32::try_from(width).map_err(|_| surface_too_large(width, height))?;
            let h = i32::try_from(height).map_err(|_| surface_too_large(width, height))?;
            self.size = (width, height);
            self.gl.viewport(0, 0, w, h);
            check_error(&self.gl, "glViewport")?;
            debug!("Renderer resized to {}x{}", width, height);
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        camera::aspect_ratio(self.size.0, self.size.1)
    }

    /// View-projection from the sphere centre for the current surface
    pub fn view_projection(&self, orientation: Quat) -> Mat4 {
        let sphere = self.mesh.config();
        camera::view_projection(
            orientation,
            sphere.center,
            sphere.radius,
            self.aspect_ratio(),
            camera::DEFAULT_FOV_Y_DEGREES.to_radians(),
        )
    }

    /// Draws the sphere with the latest video frame.
    ///
    /// `texture_matrix` comes from the decoder surface and corrects its
    /// orientation/cropping; `view_projection` comes from the camera.
    pub fn draw_frame(
        &self,
        texture: &ExternalTexture<G::Texture>,
        texture_matrix: &Mat4,
        view_projection: &Mat4,
    ) -> Result<DrawStats> {
        let submitted = self.submit(texture, texture_matrix, view_projection);

        // reset vertex state whether or not submission got through
        let gl = &self.gl;
        gl.disable_vertex_attrib_array(self.locations.position);
        gl.disable_vertex_attrib_array(self.locations.texture_coord);
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        let stats = submitted?;
        check_error(gl, "glDrawElements")?;
        trace!("Frame drawn: {:?}", stats);
        Ok(stats)
    }

    fn submit(
        &self,
        texture: &ExternalTexture<G::Texture>,
        texture_matrix: &Mat4,
        view_projection: &Mat4,
    ) -> Result<DrawStats> {
        let gl = &self.gl;
        let loc = &self.locations;

        gl.clear_color(self.clear_color);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.program.bind(gl);
        check_error(gl, "glUseProgram")?;

        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(TEXTURE_EXTERNAL_OES, Some(texture.raw()));
        gl.uniform_1_i32(&loc.sampler, 0);
        gl.uniform_matrix_4(&loc.mvp, &view_projection.to_cols_array());
        gl.uniform_matrix_4(&loc.texture_matrix, &texture_matrix.to_cols_array());
        check_error(gl, "glUniform")?;

        let stride = Vertex::STRIDE as i32;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.gpu.vertex_buffer));
        gl.enable_vertex_attrib_array(loc.position);
        gl.vertex_attrib_pointer_f32(loc.position, 3, stride, Vertex::POSITION_OFFSET as i32);
        gl.enable_vertex_attrib_array(loc.texture_coord);
        gl.vertex_attrib_pointer_f32(loc.texture_coord, 2, stride, Vertex::UV_OFFSET as i32);
        check_error(gl, "glVertexAttribPointer")?;

        let mut stats = DrawStats::default();
        for draw in &self.gpu.index_draws {
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(draw.buffer));
            // counts fit: each buffer holds at most slices^2 * 6 indices
            gl.draw_elements_u16(glow::TRIANGLES, draw.count as i32);
            stats.draw_calls += 1;
            stats.indices += draw.count;
        }
        Ok(stats)
    }

    /// Deletes buffers and program and hands the context back. The
    /// external texture is left alone.
    pub fn release(self) -> G {
        let Renderer { gl, program, gpu, .. } = self;
        gl.delete_buffer(gpu.vertex_buffer);
        for draw in gpu.index_draws {
            gl.delete_buffer(draw.buffer);
        }
        program.release(&gl);
        info!("Renderer released");
        gl
    }
}

fn surface_too_large(width: u32, height: u32) -> CoreError {
    CoreError::InvalidConfiguration(format!("surface {width}x{height} too large"))
}

fn resolve_locations<G: GlApi>(gl: &G, program: &ShaderProgram<G>) -> Result<Locations<G>> {
    Ok(Locations {
        position: program.attribute_location(gl, POSITION_ATTRIBUTE)?,
        texture_coord: program.attribute_location(gl, TEXTURE_COORD_ATTRIBUTE)?,
        mvp: program.uniform_location(gl, MVP_UNIFORM)?,
        texture_matrix: program.uniform_location(gl, TEXTURE_MATRIX_UNIFORM)?,
        sampler: program.uniform_location(gl, SAMPLER_UNIFORM)?,
    })
}

fn upload_mesh<G: GlApi>(gl: &G, mesh: &SphereMesh) -> Result<GpuMesh<G::Buffer>> {
    let vertex_buffer = upload(gl, glow::ARRAY_BUFFER, mesh.vertex_bytes(), "vertex buffer")?;

    let mut index_draws = Vec::with_capacity(mesh.num_index_buffers());
    for indices in mesh.index_buffers().filter(|indices| !indices.is_empty()) {
        match upload(gl, glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices), "index buffer") {
            Ok(buffer) => index_draws.push(IndexDraw { buffer, count: indices.len() }),
            Err(err) => {
                gl.delete_buffer(vertex_buffer);
                for draw in index_draws {
                    gl.delete_buffer(draw.buffer);
                }
                return Err(err);
            }
        }
    }

    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
    gl.bind_buffer(glow::ARRAY_BUFFER, None);
    Ok(GpuMesh { vertex_buffer, index_draws })
}

fn upload<G: GlApi>(gl: &G, target: u32, bytes: &[u8], what: &'static str) -> Result<G::Buffer> {
    let buffer = gl
        .create_buffer()
        .map_err(|reason| CoreError::ObjectCreation { what, reason })?;
    gl.bind_buffer(target, Some(buffer));
    gl.buffer_data(target, bytes, glow::STATIC_DRAW);
    if let Err(err) = check_error(gl, "glBufferData") {
        gl.delete_buffer(buffer);
        return Err(err);
    }
    Ok(buffer)
}
