//! Low-level primitives used by the renderer

pub mod highlight;
