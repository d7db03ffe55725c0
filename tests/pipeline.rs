//! End-to-end: mesh built off-thread, frames handed over, sphere drawn

use std::thread;

use fisheye_core::headless::HeadlessGl;
use fisheye_core::{
    create_external_texture, FrameSlot, GlApi, Renderer, RendererConfig, SphereConfig, SphereMesh,
};
use glam::{Mat4, Quat, Vec3};

#[test]
fn off_thread_mesh_and_frame_handoff() {
    let sphere = SphereConfig::default().with_slices(60).with_index_buffers(4);
    let mesh = thread::spawn(move || SphereMesh::new(sphere)).join().unwrap().unwrap();

    let gl = HeadlessGl::new();
    let config = RendererConfig::default().with_clear_color([0.1, 0.1, 0.1, 1.0]);
    let mut renderer = Renderer::with_mesh(gl.clone(), mesh, &config).unwrap();
    renderer.resize(1280, 720).unwrap();
    let texture = create_external_texture(&gl).unwrap();

    let frames = FrameSlot::new();
    let producer = {
        let frames = frames.clone();
        thread::spawn(move || {
            let flip = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0));
            frames.publish(flip).unwrap()
        })
    };
    let published = producer.join().unwrap();

    let update = frames.take().unwrap();
    assert_eq!(update.generation, published);
    let vp = renderer.view_projection(Quat::IDENTITY);
    let stats = renderer.draw_frame(&texture, &update.texture_matrix, &vp).unwrap();

    assert_eq!(stats.draw_calls, 4);
    assert_eq!(stats.indices, 60 * 60 * 6);
    assert_eq!(gl.current_clear_color(), [0.1, 0.1, 0.1, 1.0]);
    assert_eq!(gl.get_error(), glow::NO_ERROR);

    // nothing new published: the caller keeps its previous matrix
    assert!(frames.take().is_none());

    let gl = renderer.release();
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.live_buffers(), 0);
}

#[test]
fn drawn_indices_match_mesh_exactly() {
    let gl = HeadlessGl::new();
    let sphere = SphereConfig::default().with_slices(7).with_index_buffers(3);
    let renderer = Renderer::new(gl.clone(), &RendererConfig::default().with_sphere(sphere)).unwrap();
    let texture = create_external_texture(&gl).unwrap();
    renderer.draw_frame(&texture, &Mat4::IDENTITY, &Mat4::IDENTITY).unwrap();

    let drawn: Vec<u16> = gl.take_draws().into_iter().flat_map(|d| d.indices).collect();
    let expected: Vec<u16> = renderer.mesh().index_buffers().flatten().copied().collect();
    assert_eq!(drawn, expected);
}
