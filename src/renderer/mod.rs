//! WebGPU rendering module
//!
//! The scene builder turns a read-only snapshot of the match into canvas-space
//! triangles; the pipeline uploads and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
