//! Library side of the `interflow` command: input loading, the needs
//! screen pipeline, table rendering and logging setup.

pub mod input;
pub mod logging;
pub mod render;
pub mod screen;
