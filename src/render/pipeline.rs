//! The full design-to-pixels pass.

use crate::assets::font::FontResolver;
use crate::assets::store::ResourceStore;
use crate::content::calendar::CalendarProvider;
use crate::content::weather::{StyleCatalog, WeatherProvider};
use crate::content::{Clock, ResolveContext, ResolveMode, resolve};
use crate::foundation::error::InkframeResult;
use crate::foundation::geometry::Viewport;
use crate::model::Design;
use crate::render::canvas::{Canvas, PixelFormat};
use crate::render::compositor::composite_module;

/// Everything a render pass needs besides the design itself.
pub struct RenderContext<'a> {
    pub viewport: Viewport,
    pub format: PixelFormat,
    pub mode: ResolveMode,
    pub resources: &'a dyn ResourceStore,
    pub weather: &'a dyn WeatherProvider,
    pub calendar: &'a dyn CalendarProvider,
    pub styles: &'a StyleCatalog,
    pub clock: &'a dyn Clock,
    pub default_font_path: Option<std::path::PathBuf>,
}

/// Render a design into a fresh canvas.
///
/// Modules are resolved and composited in document order, later modules
/// painting over earlier ones. A failing module is logged and skipped; one
/// bad module must not blank the whole panel.
#[tracing::instrument(skip(design, ctx), fields(design = %design.name, modules = design.modules.len()))]
pub fn render(design: &Design, ctx: &RenderContext<'_>) -> InkframeResult<Canvas> {
    design.validate()?;

    let mut canvas = Canvas::new(ctx.viewport.width, ctx.viewport.height, ctx.format);
    let mut fonts = FontResolver::new(ctx.resources, ctx.default_font_path.clone());
    let resolve_ctx = ResolveContext {
        mode: ctx.mode,
        weather: ctx.weather,
        calendar: ctx.calendar,
        styles: ctx.styles,
        clock: ctx.clock,
    };

    for (i, module) in design.modules.iter().enumerate() {
        let resolved = resolve(module, &resolve_ctx);
        if let Err(e) = composite_module(
            &mut canvas,
            &ctx.viewport,
            module,
            &resolved,
            &mut fonts,
            ctx.resources,
        ) {
            tracing::warn!(module = i, error = %e, "module failed to composite, skipping");
        }
    }

    Ok(canvas)
}
