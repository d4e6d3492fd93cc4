//! Deferred, sorted, shader-grouped rendering.
//!
//! A [`RenderBatch`] collects renderables between [`begin`](RenderBatch::begin)
//! and [`end`](RenderBatch::end). Nothing is drawn on submission: at each
//! flush the pending list is sorted, walked once with consecutive
//! renderables of the same shader drawn in one `begin/render/end` span, and
//! then handed back to the pool.
//!
//! # Example
//!
//! ```
//! use starmesh_graphics::{
//!     Camera, Renderable, RenderBatch, Shader, ShaderLibrary,
//! };
//!
//! struct Counting(usize);
//!
//! impl Shader for Counting {
//!     fn begin(&mut self, _camera: &Camera) {}
//!     fn render(&mut self, _renderable: &Renderable) {
//!         self.0 += 1;
//!     }
//!     fn end(&mut self) {}
//! }
//!
//! let mut shaders = ShaderLibrary::new();
//! shaders.add(Box::new(Counting(0)));
//!
//! let mut batch = RenderBatch::new(shaders);
//! batch.begin(Camera::default())?;
//! let r = batch.obtain();
//! batch.render(r)?;
//! let stats = batch.end()?;
//! assert_eq!(stats.renderables, 1);
//! assert_eq!(stats.spans, 1);
//! # Ok::<(), starmesh_graphics::BatchError>(())
//! ```

use std::sync::Arc;

use starmesh_core::pool::Pool;

use crate::camera::Camera;
use crate::environment::Environment;
use crate::error::{BatchError, BatchResult};
use crate::profiling::{profile_plot, profile_scope};
use crate::renderable::{Renderable, RenderableProvider};
use crate::shader::{ShaderHandle, ShaderProvider};
use crate::sort::{DefaultRenderSorter, RenderSorter};

/// Counts accumulated over the flushes of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Renderables drawn.
    pub renderables: usize,
    /// Shader `begin/end` spans issued.
    pub spans: usize,
    pub flushes: usize,
}

/// Sorted render batch over a shader provider `P`.
pub struct RenderBatch<P: ShaderProvider> {
    shaders: P,
    sorter: Box<dyn RenderSorter>,
    pool: Pool<Renderable>,
    pending: Vec<Renderable>,
    camera: Option<Camera>,
    stats: BatchStats,
}

impl<P: ShaderProvider + std::fmt::Debug> std::fmt::Debug for RenderBatch<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderBatch")
            .field("shaders", &self.shaders)
            .field("pending", &self.pending.len())
            .field("camera", &self.camera)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<P: ShaderProvider> RenderBatch<P> {
    /// Batch sorting with [`DefaultRenderSorter`].
    pub fn new(shaders: P) -> Self {
        Self::with_sorter(shaders, Box::new(DefaultRenderSorter))
    }

    pub fn with_sorter(shaders: P, sorter: Box<dyn RenderSorter>) -> Self {
        Self {
            shaders,
            sorter,
            pool: Pool::new(),
            pending: Vec::new(),
            camera: None,
            stats: BatchStats::default(),
        }
    }

    pub fn shaders(&self) -> &P {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut P {
        &mut self.shaders
    }

    pub fn set_sorter(&mut self, sorter: Box<dyn RenderSorter>) {
        self.sorter = sorter;
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn is_begun(&self) -> bool {
        self.camera.is_some()
    }

    /// Renderables submitted since the last flush.
    pub fn pending(&self) -> &[Renderable] {
        &self.pending
    }

    pub fn pool(&self) -> &Pool<Renderable> {
        &self.pool
    }

    /// Take a reset renderable from the batch's pool.
    pub fn obtain(&mut self) -> Renderable {
        self.pool.obtain()
    }

    /// Start a batch viewed through `camera`.
    pub fn begin(&mut self, camera: Camera) -> BatchResult<()> {
        if self.camera.is_some() {
            return Err(BatchError::AlreadyBegun);
        }
        self.camera = Some(camera);
        self.stats = BatchStats::default();
        Ok(())
    }

    /// Switch cameras, drawing everything submitted so far first.
    pub fn set_camera(&mut self, camera: Camera) -> BatchResult<()> {
        self.ensure_begun()?;
        if !self.pending.is_empty() {
            self.flush()?;
        }
        self.camera = Some(camera);
        Ok(())
    }

    fn ensure_begun(&self) -> BatchResult<()> {
        if self.camera.is_some() {
            Ok(())
        } else {
            Err(BatchError::NotBegun)
        }
    }

    /// Queue one renderable, resolving its shader.
    ///
    /// On error the renderable goes back to the pool.
    pub fn render(&mut self, mut renderable: Renderable) -> BatchResult<()> {
        if let Err(e) = self.ensure_begun() {
            self.pool.free(renderable);
            return Err(e);
        }
        match self.shaders.shader_for(&renderable) {
            Ok(handle) => {
                renderable.shader = Some(handle);
                self.pending.push(renderable);
                Ok(())
            }
            Err(e) => {
                self.pool.free(renderable);
                Err(e)
            }
        }
    }

    /// Queue the renderables of `provider`.
    pub fn render_provider(&mut self, provider: &dyn RenderableProvider) -> BatchResult<()> {
        self.render_provider_with(provider, None, None)
    }

    /// Queue the renderables of `provider` lit by `environment`.
    pub fn render_provider_with_environment(
        &mut self,
        provider: &dyn RenderableProvider,
        environment: Arc<Environment>,
    ) -> BatchResult<()> {
        self.render_provider_with(provider, Some(environment), None)
    }

    /// Queue the renderables of `provider`, suggesting `shader` to the
    /// shader provider.
    pub fn render_provider_with_shader(
        &mut self,
        provider: &dyn RenderableProvider,
        shader: ShaderHandle,
    ) -> BatchResult<()> {
        self.render_provider_with(provider, None, Some(shader))
    }

    /// Queue the renderables of `provider` with an optional environment
    /// and shader hint applied to each.
    ///
    /// If any shader lookup fails, none of this provider's renderables stay
    /// queued.
    pub fn render_provider_with(
        &mut self,
        provider: &dyn RenderableProvider,
        environment: Option<Arc<Environment>>,
        shader: Option<ShaderHandle>,
    ) -> BatchResult<()> {
        self.ensure_begun()?;
        let offset = self.pending.len();
        provider.renderables(&mut self.pending, &mut self.pool);

        let mut result = Ok(());
        for r in &mut self.pending[offset..] {
            if environment.is_some() {
                r.environment = environment.clone();
            }
            if shader.is_some() {
                r.shader = shader;
            }
            match self.shaders.shader_for(r) {
                Ok(handle) => r.shader = Some(handle),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        if result.is_err() {
            self.pool.free_all(self.pending.drain(offset..));
        }
        result
    }

    /// [`render_provider_with`](Self::render_provider_with) for each provider.
    pub fn render_all<'a, I>(
        &mut self,
        providers: I,
        environment: Option<Arc<Environment>>,
        shader: Option<ShaderHandle>,
    ) -> BatchResult<()>
    where
        I: IntoIterator<Item = &'a dyn RenderableProvider>,
    {
        for provider in providers {
            self.render_provider_with(provider, environment.clone(), shader)?;
        }
        Ok(())
    }

    /// Sort and draw everything pending, then recycle it.
    pub fn flush(&mut self) -> BatchResult<()> {
        profile_scope!("render_batch_flush");
        let camera = self.camera.ok_or(BatchError::NotBegun)?;
        profile_plot!("batch_renderables", self.pending.len());
        self.sorter.sort(&camera, &mut self.pending);

        let result = draw_spans(&mut self.shaders, &self.pending, &camera, &mut self.stats);
        self.stats.flushes += 1;
        self.pool.free_all(self.pending.drain(..));
        result
    }

    /// Flush and close the batch.
    pub fn end(&mut self) -> BatchResult<BatchStats> {
        self.ensure_begun()?;
        let result = self.flush();
        self.camera = None;
        result?;
        log::debug!(
            "render batch: {} renderables in {} spans over {} flushes",
            self.stats.renderables,
            self.stats.spans,
            self.stats.flushes
        );
        Ok(self.stats)
    }

    /// Close the batch without drawing what is pending.
    pub fn cancel(&mut self) {
        self.pool.free_all(self.pending.drain(..));
        self.camera = None;
    }
}

/// Draw `pending` in order, opening a new shader span whenever the shader
/// changes.
fn draw_spans<P: ShaderProvider>(
    shaders: &mut P,
    pending: &[Renderable],
    camera: &Camera,
    stats: &mut BatchStats,
) -> BatchResult<()> {
    let mut current: Option<ShaderHandle> = None;
    let mut span_len = 0;
    for r in pending {
        let Some(handle) = r.shader else { continue };
        if current != Some(handle) {
            if let Some(prev) = current {
                end_span(shaders, prev, span_len);
            }
            shaders
                .shader_mut(handle)
                .ok_or(BatchError::UnknownShader(handle))?
                .begin(camera);
            current = Some(handle);
            span_len = 0;
            stats.spans += 1;
        }
        if let Some(shader) = shaders.shader_mut(handle) {
            shader.render(r);
        }
        span_len += 1;
        stats.renderables += 1;
    }
    if let Some(prev) = current {
        end_span(shaders, prev, span_len);
    }
    Ok(())
}

fn end_span<P: ShaderProvider>(shaders: &mut P, handle: ShaderHandle, len: usize) {
    if let Some(shader) = shaders.shader_mut(handle) {
        shader.end();
    }
    log::trace!("shader {:?}: {} renderables", handle, len);
}
