//! Logical vertex/index array descriptions bound to buffer segments, plus
//! the device setup/render paths that consume them.

mod array;
mod index_buffer;
mod pipeline;
mod vertex_buffer;

pub use array::{ArraySource, IndexArray, VertexArray};
pub use index_buffer::IndexBuffer;
pub use pipeline::{
    call_vertex_array_sequence, render, render_indexed, render_indexed_instanced, render_instanced,
    VertexArrayPipeline, VertexArraySequence,
};
pub use vertex_buffer::{RenderMode, VertexBuffer, VertexBufferData};
