//! Tera rendering engine for the minion configuration file.
//!
//! The template is a fixed skeleton baked into the binary at compile time
//! via `include_str!`; the only inputs are the fields of
//! [`TemplateContext`]. Rendering is pure: the same settings record always
//! produces byte-identical output.

use tera::Tera;

use brine_core::MinionSettings;

use crate::context::TemplateContext;
use crate::error::RenderError;

const MINION_TEMPLATE_NAME: &str = "minion.conf.tera";
const MINION_TEMPLATE: &str = include_str!("templates/minion.conf.tera");

/// Tera-based renderer for the minion configuration file.
///
/// Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with the embedded template.
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(MINION_TEMPLATE_NAME, MINION_TEMPLATE)?;
        Ok(Renderer { tera })
    }

    /// Render the configuration file text for a settings record.
    pub fn render(&self, settings: &MinionSettings) -> Result<String, RenderError> {
        let ctx = TemplateContext::from_settings(settings);
        self.render_with_context(&ctx)
    }

    /// Render using a caller-provided [`TemplateContext`].
    pub fn render_with_context(&self, ctx: &TemplateContext) -> Result<String, RenderError> {
        Ok(self.tera.render(MINION_TEMPLATE_NAME, &ctx.to_tera_context()?)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
