//! Shaders as seen by the batch, and the providers that own them.

use crate::camera::Camera;
use crate::error::{BatchError, BatchResult};
use crate::renderable::Renderable;

/// Index of a shader inside its [`ShaderProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// A shader program able to draw renderables.
///
/// The batch calls `begin`, then `render` for each renderable of a span,
/// then `end`. GPU work is up to the implementation.
pub trait Shader {
    /// Whether this shader can draw `renderable`.
    fn can_render(&self, _renderable: &Renderable) -> bool {
        true
    }

    fn begin(&mut self, camera: &Camera);

    fn render(&mut self, renderable: &Renderable);

    fn end(&mut self);
}

/// Owns shaders and picks one per renderable.
pub trait ShaderProvider {
    /// Choose the shader for `renderable`.
    ///
    /// A preset [`Renderable::shader`] is a hint: providers keep it when
    /// that shader can render the renderable.
    fn shader_for(&mut self, renderable: &Renderable) -> BatchResult<ShaderHandle>;

    fn shader_mut(&mut self, handle: ShaderHandle) -> Option<&mut dyn Shader>;
}

type ShaderFactory = Box<dyn FnMut(&Renderable) -> Box<dyn Shader>>;

/// A list of shaders searched in insertion order.
///
/// When no registered shader can render a renderable, the optional factory
/// creates one and adds it to the list.
#[derive(Default)]
pub struct ShaderLibrary {
    shaders: Vec<Box<dyn Shader>>,
    factory: Option<ShaderFactory>,
}

impl std::fmt::Debug for ShaderLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderLibrary")
            .field("shaders", &self.shaders.len())
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_factory(mut self, factory: impl FnMut(&Renderable) -> Box<dyn Shader> + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn add(&mut self, shader: Box<dyn Shader>) -> ShaderHandle {
        self.shaders.push(shader);
        ShaderHandle(self.shaders.len() as u32 - 1)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

impl ShaderProvider for ShaderLibrary {
    fn shader_for(&mut self, renderable: &Renderable) -> BatchResult<ShaderHandle> {
        if let Some(hint) = renderable.shader {
            let shader = self
                .shaders
                .get(hint.0 as usize)
                .ok_or(BatchError::UnknownShader(hint))?;
            if shader.can_render(renderable) {
                return Ok(hint);
            }
        }
        if let Some(i) = self.shaders.iter().position(|s| s.can_render(renderable)) {
            return Ok(ShaderHandle(i as u32));
        }
        match self.factory.as_mut() {
            Some(factory) => {
                let shader = factory(renderable);
                log::debug!("created shader {} for renderable", self.shaders.len());
                Ok(self.add(shader))
            }
            None => Err(BatchError::NoShader),
        }
    }

    fn shader_mut(&mut self, handle: ShaderHandle) -> Option<&mut dyn Shader> {
        self.shaders.get_mut(handle.0 as usize).map(|s| s.as_mut() as &mut dyn Shader)
    }
}
