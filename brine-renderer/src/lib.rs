//! # brine-renderer
//!
//! Tera-based engine that renders the salt-minion configuration file from
//! a [`brine_core::MinionSettings`] record.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use brine_core::MinionSettings;
//! use brine_renderer::Renderer;
//!
//! fn render(settings: &MinionSettings) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(text) = renderer.render(settings) {
//!             println!("{} bytes", text.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::TemplateContext;
pub use engine::Renderer;
pub use error::RenderError;
