use std::path::{Path, PathBuf};

use glam::{Vec3, Vec4};
use tabletop_scene::shading;
use tabletop_scene::{
    DecodedImage, ImageDecoder, InputState, KeyCode, MeshKind, ProjectionMode, RecordingBackend,
    Scene, SceneComposer, SceneConfig, SceneContext, SceneObject, StaticViewport, TextureError,
    TextureResult, ViewController,
};

/// Every path decodes to a 2x2 RGBA image.
struct SolidDecoder;

impl ImageDecoder for SolidDecoder {
    fn decode(&self, _path: &Path) -> TextureResult<DecodedImage> {
        Ok(DecodedImage {
            pixels: vec![255; 16],
            width: 2,
            height: 2,
            channels: 4,
        })
    }
}

struct BrokenDecoder;

impl ImageDecoder for BrokenDecoder {
    fn decode(&self, path: &Path) -> TextureResult<DecodedImage> {
        Err(TextureError::Decode {
            path: path.to_path_buf(),
            message: "truncated file".into(),
        })
    }
}

fn default_context() -> SceneContext {
    SceneContext::from_config(&SceneConfig::default()).expect("default config is valid")
}

#[test]
fn one_frame_pushes_camera_then_draws_every_object() {
    let mut context = default_context();
    let mut backend = RecordingBackend::new();
    context.prepare(&SolidDecoder, &mut backend);
    backend.clear_log();

    let viewport = StaticViewport::new(1000, 800);
    let frame = context.frame(0.5, &InputState::new(), &viewport, &mut backend);

    assert!(!frame.close_requested);
    assert_eq!(frame.mode, ProjectionMode::Perspective);
    assert_eq!(backend.draws().len(), Scene::still_life().objects.len());
    for draw in backend.draws() {
        assert_eq!(draw.uniforms.get_mat4(shading::VIEW), Some(frame.view));
        assert_eq!(draw.uniforms.get_mat4(shading::PROJECTION), Some(frame.projection));
        assert_eq!(
            draw.uniforms.get_vec3(shading::SPOT_POSITION),
            Some(frame.camera_position)
        );
    }
}

#[test]
fn held_keys_move_the_camera_and_switch_projection() {
    let mut context = default_context();
    let mut backend = RecordingBackend::new();
    context.prepare(&SolidDecoder, &mut backend);
    let viewport = StaticViewport::new(800, 800);
    let input = InputState::new();

    context.frame(1.0, &input, &viewport, &mut backend);
    let start = context.view.camera().position;

    input.set_key_down(KeyCode::Character('W'));
    input.set_key_down(KeyCode::Character('O'));
    let frame = context.frame(1.5, &input, &viewport, &mut backend);

    assert_eq!(frame.mode, ProjectionMode::Orthographic);
    assert!((frame.delta_time - 0.5).abs() < 1e-6);
    let moved = context.view.camera().position - start;
    assert!(moved.z < 0.0, "W should move along -Z, moved {moved:?}");
}

#[test]
fn escape_requests_close() {
    let mut context = default_context();
    let mut backend = RecordingBackend::new();
    let input = InputState::new();
    input.set_key_down(KeyCode::from_name("Escape").expect("named key"));
    let frame = context.frame(0.1, &input, &StaticViewport::new(640, 480), &mut backend);
    assert!(frame.close_requested);
}

#[test]
fn failed_textures_leave_objects_untextured() {
    let mut context = default_context();
    let mut backend = RecordingBackend::new();
    let summary = context.prepare(&BrokenDecoder, &mut backend);
    assert_eq!(summary.textures, 0);
    assert_eq!(summary.meshes, MeshKind::ALL.len());

    context.frame(0.0, &InputState::new(), &StaticViewport::new(640, 480), &mut backend);
    assert_eq!(backend.draws().len(), 14);
    assert!(backend.draws().iter().all(|draw| draw.texture.is_none()));
}

#[test]
fn custom_scene_reuses_shared_meshes() {
    let scene = Scene::new(vec![
        SceneObject::new("crate", MeshKind::Box)
            .scaled(Vec3::splat(2.0))
            .colored(Vec4::new(0.3, 0.2, 0.1, 1.0))
            .material("wood"),
        SceneObject::new("lid", MeshKind::Box)
            .at(Vec3::Y * 2.0)
            .material("stone")
            .textured("slate"),
    ]);
    let composer = SceneComposer::new(scene, vec![(PathBuf::from("slate.png"), "slate".into())]);
    let mut context = SceneContext::new(ViewController::default(), composer);
    let mut backend = RecordingBackend::new();
    context.prepare(&SolidDecoder, &mut backend);
    backend.clear_log();

    context.frame(0.0, &InputState::new(), &StaticViewport::new(640, 480), &mut backend);
    let draws = backend.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].mesh, Some(MeshKind::Box));
    assert_eq!(draws[0].mesh, draws[1].mesh);
    assert_eq!(draws[0].texture, None);
    assert_eq!(draws[1].texture, context.composer.textures().find_handle("slate"));
    assert_eq!(
        draws[1].uniforms.get_float(shading::MATERIAL_SHININESS),
        Some(6.0)
    );
    assert_eq!(
        draws[1].uniforms.get_mat4(shading::MODEL),
        Some(glam::Mat4::from_translation(Vec3::Y * 2.0))
    );

    context.shutdown(&mut backend);
    assert_eq!(backend.live_textures(), 0);
}

#[test]
fn keys_held_through_startup_only_move_by_the_first_frame() {
    let mut context = default_context();
    let mut backend = RecordingBackend::new();
    let input = InputState::new();
    input.set_key_down(KeyCode::Character('W'));

    context.prepare(&SolidDecoder, &mut backend);
    context.restart_clock(30.0);
    let frame = context.frame(30.05, &input, &StaticViewport::new(640, 480), &mut backend);

    assert!((frame.delta_time - 0.05).abs() < 1e-4);
    assert!(frame.camera_position.abs_diff_eq(Vec3::new(0.0, 5.0, 19.0), 1e-3));
}
