//! WebGPU rendering module
//!
//! Every actor is a flat-coloured quad; the simulation's playfield pixels are
//! letterboxed into the canvas.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
