//! Rendering module
//!
//! Painters draw through the [`Canvas`] trait; the browser build targets the
//! Canvas 2D context, the headless build tessellates into a [`ShapeBatch`].

pub mod batch;
pub mod canvas;
pub mod draw;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use batch::{ShapeBatch, TextRun, Vertex};
pub use canvas::{Canvas, TextAlign, TextStyle};
pub use draw::render_world;
#[cfg(target_arch = "wasm32")]
pub use web::WebCanvas;
