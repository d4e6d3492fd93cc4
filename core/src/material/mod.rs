//! Materials attached to model node parts.
//!
//! The mesh pipeline treats materials as opaque, shared values. The only
//! state it inspects is the [`BlendingAttribute`], which decides whether a
//! renderable is sorted with the opaque or the blended geometry.
//!
//! - [`Material`] — Named bag of typed properties plus optional blending
//! - [`MaterialValue`] — Typed property value (float, vec3, vec4, color)
//! - [`BlendingAttribute`] — Blend factors and opacity

use crate::color::Color;

/// Well-known material property semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaterialSemantic {
    /// Diffuse color.
    Diffuse,
    /// Emissive color.
    Emissive,
    /// Specular color.
    Specular,
    /// Specular exponent.
    Shininess,
    /// Custom property for application-defined semantics.
    Custom(String),
}

/// A typed material property value.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    /// Single float.
    Float(f32),
    /// 3-component vector.
    Vec3([f32; 3]),
    /// 4-component vector.
    Vec4([f32; 4]),
    /// Color.
    Color(Color),
}

/// A single material property: semantic tag + typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    /// What this property represents.
    pub semantic: MaterialSemantic,
    /// The property value.
    pub value: MaterialValue,
}

/// Blend factor applied to the source or destination color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendFactor {
    Zero,
    One,
    #[default]
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Alpha blending state of a material.
///
/// A material only counts as blended when it carries this attribute *and*
/// [`blended`](Self::blended) is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendingAttribute {
    /// Whether blending is enabled.
    pub blended: bool,
    /// Source blend factor.
    pub source: BlendFactor,
    /// Destination blend factor.
    pub destination: BlendFactor,
    /// Constant opacity multiplier.
    pub opacity: f32,
}

impl BlendingAttribute {
    /// Standard `src_alpha, 1 - src_alpha` blending at the given opacity.
    pub fn new(opacity: f32) -> Self {
        Self {
            blended: true,
            source: BlendFactor::SrcAlpha,
            destination: BlendFactor::OneMinusSrcAlpha,
            opacity,
        }
    }

    /// Additive blending (`src_alpha, one`).
    pub fn additive(opacity: f32) -> Self {
        Self {
            destination: BlendFactor::One,
            ..Self::new(opacity)
        }
    }
}

impl Default for BlendingAttribute {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Material definition.
///
/// Materials are shared via `Arc` between node parts; the model registries
/// deduplicate them by pointer.
///
/// # Example
///
/// ```
/// use starmesh_core::material::*;
/// use starmesh_core::color::Color;
///
/// let mat = Material::new("atmosphere")
///     .with_blending(BlendingAttribute::new(0.6))
///     .with_property(MaterialProperty {
///         semantic: MaterialSemantic::Diffuse,
///         value: MaterialValue::Color(Color::BLUE),
///     });
/// assert!(mat.is_blended());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Material {
    /// Material identifier.
    pub id: String,
    /// Blending state, `None` for opaque materials.
    pub blending: Option<BlendingAttribute>,
    /// Whether back faces are rendered.
    pub double_sided: bool,
    /// Material properties.
    pub properties: Vec<MaterialProperty>,
}

impl Material {
    /// Creates a new opaque material with no properties.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the blending state.
    #[must_use]
    pub fn with_blending(mut self, blending: BlendingAttribute) -> Self {
        self.blending = Some(blending);
        self
    }

    /// Set double-sided rendering.
    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, property: MaterialProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Whether renderables using this material must be drawn after opaque geometry.
    pub fn is_blended(&self) -> bool {
        self.blending.is_some_and(|b| b.blended)
    }

    /// Find a property value by semantic.
    pub fn get(&self, semantic: &MaterialSemantic) -> Option<&MaterialValue> {
        self.properties
            .iter()
            .find(|p| &p.semantic == semantic)
            .map(|p| &p.value)
    }

    /// Get a color property by semantic.
    pub fn get_color(&self, semantic: &MaterialSemantic) -> Option<Color> {
        match self.get(semantic)? {
            MaterialValue::Color(c) => Some(*c),
            MaterialValue::Vec4(v) => Some(Color::from(*v)),
            _ => None,
        }
    }

    /// Get a float property by semantic.
    pub fn get_float(&self, semantic: &MaterialSemantic) -> Option<f32> {
        match self.get(semantic)? {
            MaterialValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}
