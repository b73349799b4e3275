use crate::error::Result;
use crate::surfaces::{Surface, Viewport};
use crate::uniforms::EffectUniforms;

/// The two full-screen passes and the surfaces they run over.
pub trait RenderBackend {
    type Surface: Surface;

    /// Allocates one offscreen surface, cleared to transparent.
    fn allocate(&mut self, viewport: Viewport) -> Result<Self::Surface>;

    /// Frees a surface that is no longer held by the frame loop.
    fn release(&mut self, _surface: Self::Surface) {}

    /// Shaded pass: reads `source`, writes the next frame into `target`.
    fn effect_pass(
        &mut self,
        source: &Self::Surface,
        target: &mut Self::Surface,
        uniforms: &EffectUniforms,
    );

    /// Unshaded pass: shows `latest` on the visible framebuffer.
    fn composite_pass(&mut self, latest: &Self::Surface);
}
