//! Backends implementing [`RenderBackend`](crate::gfx::RenderBackend).

pub mod native;
pub mod recording;
pub mod uniforms;

pub use native::Renderer;
pub use recording::{Command, DrawRecord, RecordingBackend};
pub use uniforms::DrawUniform;
