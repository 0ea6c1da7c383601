//! Immediate-mode tabletop still-life composer.
//!
//! The crate is split into small pieces that only meet at two seams: the
//! [`ShadingInterface`] every uniform write goes through and the
//! [`GraphicsResources`] trait that owns textures, meshes and draws. The
//! wgpu [`Renderer`] implements both for on-screen output, while
//! [`RecordingBackend`] implements them in memory so the whole frame script
//! can run headless and under test.

pub mod camera;
pub mod composer;
pub mod config;
pub mod decoder;
pub mod error;
pub mod gfx;
pub mod input;
pub mod light;
pub mod material;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod shading;
pub mod texture;
pub mod transform;
pub mod view;
pub mod viewport;

pub use camera::{Camera, CameraMovement, ProjectionMode};
pub use composer::{PrepareSummary, SceneComposer, SceneContext};
pub use config::{KeyBindings, SceneConfig};
pub use decoder::{DecodedImage, FileImageDecoder, ImageDecoder};
pub use error::{TextureError, TextureResult};
pub use gfx::{GraphicsResources, MeshHandle, PixelFormat, RenderBackend, TextureHandle};
pub use input::{InputSource, InputState, KeyCode, NamedKey};
pub use light::LightRig;
pub use material::{MaterialDescriptor, MaterialRegistry};
pub use mesh::MeshKind;
pub use render::{RecordingBackend, Renderer};
pub use scene::{Scene, SceneObject};
pub use shading::{ShadingInterface, UniformStore, UniformValue};
pub use texture::TextureRegistry;
pub use transform::TransformSpec;
pub use view::{ViewController, ViewFrame};
pub use viewport::{StaticViewport, ViewportProvider, WindowViewport};
