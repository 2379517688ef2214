//! Presentation helpers: dotted pre-order tree printing (shared by
//! `-ast`/`-st`) and `Print` value rendering.

pub mod pretty;
pub mod render;
