//! Vertex layout definitions for meshes.
//!
//! A layout is the ordered set of per-vertex fields a builder writes. All
//! fields are stored as `f32`, interleaved in a single buffer, so offsets and
//! strides are counted in floats. A packed color occupies one float whose bits
//! hold the ABGR8888 color (see [`Color::to_packed_float`]).
//!
//! Layouts are shared via `Arc`. Two layouts are equal when their attribute
//! lists are equal; the debug label does not participate, so the model
//! assembler can merge parts built from separately created but identical
//! layouts.
//!
//! # Example
//!
//! ```
//! use starmesh_core::mesh::{VertexLayout, VertexUsage};
//!
//! let layout = VertexLayout::from_usage(VertexUsage::POSITION | VertexUsage::NORMAL);
//! assert_eq!(layout.stride(), 6);
//! assert_eq!(*layout, *VertexLayout::position_normal());
//! ```
//!
//! [`Color::to_packed_float`]: crate::color::Color::to_packed_float

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bitflags::bitflags;

bitflags! {
    /// Bitmask selecting the attributes of a vertex layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexUsage: u32 {
        /// Position (3 floats). Required by every builder.
        const POSITION = 1 << 0;
        /// Color as 4 separate floats.
        const COLOR_UNPACKED = 1 << 1;
        /// Color packed into a single float.
        const COLOR_PACKED = 1 << 2;
        /// Normal (3 floats).
        const NORMAL = 1 << 3;
        /// Tangent (3 floats).
        const TANGENT = 1 << 4;
        /// Binormal (3 floats).
        const BINORMAL = 1 << 5;
        /// First texture coordinate set (2 floats).
        const TEX_COORDS = 1 << 6;
    }
}

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Vertex position.
    Position,
    /// Vertex color, one float per channel.
    ColorUnpacked,
    /// Vertex color packed into one float.
    ColorPacked,
    /// Vertex normal.
    Normal,
    /// Vertex tangent.
    Tangent,
    /// Vertex binormal (bitangent).
    Binormal,
    /// Texture coordinates set 0.
    TexCoord0,
}

impl VertexAttributeSemantic {
    /// The usage bit this semantic corresponds to.
    pub fn usage(&self) -> VertexUsage {
        match self {
            Self::Position => VertexUsage::POSITION,
            Self::ColorUnpacked => VertexUsage::COLOR_UNPACKED,
            Self::ColorPacked => VertexUsage::COLOR_PACKED,
            Self::Normal => VertexUsage::NORMAL,
            Self::Tangent => VertexUsage::TANGENT,
            Self::Binormal => VertexUsage::BINORMAL,
            Self::TexCoord0 => VertexUsage::TEX_COORDS,
        }
    }

    /// Shader input name the host binds this attribute to.
    pub fn default_alias(&self) -> &'static str {
        match self {
            Self::Position => "a_position",
            Self::ColorUnpacked | Self::ColorPacked => "a_color",
            Self::Normal => "a_normal",
            Self::Tangent => "a_tangent",
            Self::Binormal => "a_binormal",
            Self::TexCoord0 => "a_texCoord0",
        }
    }

    /// Number of floats this attribute occupies in a vertex.
    pub fn float_count(&self) -> u32 {
        match self {
            Self::Position | Self::Normal | Self::Tangent | Self::Binormal => 3,
            Self::ColorUnpacked => 4,
            Self::ColorPacked => 1,
            Self::TexCoord0 => 2,
        }
    }

    /// Number of logical components (a packed color still has four).
    pub fn components(&self) -> u32 {
        match self {
            Self::ColorPacked => 4,
            other => other.float_count(),
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Semantic meaning of this attribute.
    pub semantic: VertexAttributeSemantic,
    /// Offset within a vertex, in floats.
    pub offset: u32,
    /// Shader input name.
    pub alias: String,
}

impl VertexAttribute {
    /// Create an attribute with the default alias for its semantic.
    ///
    /// The offset is assigned when the attribute is added to a layout.
    pub fn new(semantic: VertexAttributeSemantic) -> Self {
        Self {
            semantic,
            offset: 0,
            alias: semantic.default_alias().to_string(),
        }
    }

    pub fn position() -> Self {
        Self::new(VertexAttributeSemantic::Position)
    }

    pub fn normal() -> Self {
        Self::new(VertexAttributeSemantic::Normal)
    }

    pub fn tangent() -> Self {
        Self::new(VertexAttributeSemantic::Tangent)
    }

    pub fn binormal() -> Self {
        Self::new(VertexAttributeSemantic::Binormal)
    }

    pub fn color() -> Self {
        Self::new(VertexAttributeSemantic::ColorUnpacked)
    }

    pub fn color_packed() -> Self {
        Self::new(VertexAttributeSemantic::ColorPacked)
    }

    pub fn texcoord0() -> Self {
        Self::new(VertexAttributeSemantic::TexCoord0)
    }

    /// Override the shader input name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Number of floats this attribute occupies.
    pub fn float_count(&self) -> u32 {
        self.semantic.float_count()
    }
}

/// Describes the interleaved layout of one vertex.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    /// Attributes in storage order.
    pub attributes: Vec<VertexAttribute>,
    /// Optional label for debugging.
    pub label: Option<String>,
    stride: u32,
}

impl VertexLayout {
    /// Create a new empty vertex layout.
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            label: None,
            stride: 0,
        }
    }

    /// Append an attribute after the existing ones.
    #[must_use]
    pub fn with_attribute(mut self, mut attribute: VertexAttribute) -> Self {
        attribute.offset = self.stride;
        self.stride += attribute.float_count();
        self.attributes.push(attribute);
        self
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build a layout from a usage mask.
    ///
    /// Attributes are laid out as position, color (unpacked, then packed),
    /// normal, tangent, binormal, texture coordinates.
    pub fn from_usage(usage: VertexUsage) -> Arc<Self> {
        use VertexAttributeSemantic::*;

        let layout = [
            Position,
            ColorUnpacked,
            ColorPacked,
            Normal,
            Tangent,
            Binormal,
            TexCoord0,
        ]
        .into_iter()
        .filter(|s| usage.contains(s.usage()))
        .fold(Self::new(), |layout, s| {
            layout.with_attribute(VertexAttribute::new(s))
        });
        Arc::new(layout)
    }

    /// Floats per vertex.
    pub fn stride(&self) -> usize {
        self.stride as usize
    }

    /// Bytes per vertex.
    pub fn stride_bytes(&self) -> usize {
        self.stride as usize * std::mem::size_of::<f32>()
    }

    /// Usage mask describing this layout.
    pub fn usage(&self) -> VertexUsage {
        self.attributes
            .iter()
            .fold(VertexUsage::empty(), |u, a| u | a.semantic.usage())
    }

    /// Check if this layout has a specific semantic.
    pub fn has_semantic(&self, semantic: VertexAttributeSemantic) -> bool {
        self.attributes.iter().any(|attr| attr.semantic == semantic)
    }

    /// Get an attribute by semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.semantic == semantic)
    }

    /// Float offset of an attribute, if present.
    pub fn offset_of(&self, semantic: VertexAttributeSemantic) -> Option<usize> {
        self.get_attribute(semantic).map(|a| a.offset as usize)
    }

    /// Check the layout is usable by a mesh builder.
    ///
    /// Rejects duplicated semantics and layouts declaring both color forms.
    pub fn validate(&self) -> Result<(), String> {
        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i]
                .iter()
                .any(|other| other.semantic == attr.semantic)
            {
                return Err(format!("attribute {:?} declared twice", attr.semantic));
            }
        }
        if self.has_semantic(VertexAttributeSemantic::ColorUnpacked)
            && self.has_semantic(VertexAttributeSemantic::ColorPacked)
        {
            return Err("layout declares both packed and unpacked color".to_string());
        }
        Ok(())
    }
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for VertexLayout {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl Eq for VertexLayout {}

impl Hash for VertexLayout {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attributes.hash(state);
    }
}

// ============================================================================
// Common Layouts
// ============================================================================

impl VertexLayout {
    /// Position-only layout (3 floats).
    pub fn position_only() -> Arc<Self> {
        Arc::new(
            Self::new()
                .with_attribute(VertexAttribute::position())
                .with_label("position_only"),
        )
    }

    /// Position + color layout (7 floats), for debug lines and axes.
    pub fn position_color() -> Arc<Self> {
        Arc::new(
            Self::new()
                .with_attribute(VertexAttribute::position())
                .with_attribute(VertexAttribute::color())
                .with_label("position_color"),
        )
    }

    /// Position + normal layout (6 floats).
    pub fn position_normal() -> Arc<Self> {
        Arc::new(
            Self::new()
                .with_attribute(VertexAttribute::position())
                .with_attribute(VertexAttribute::normal())
                .with_label("position_normal"),
        )
    }

    /// Position + normal + texcoord layout (8 floats).
    pub fn position_normal_uv() -> Arc<Self> {
        Arc::new(
            Self::new()
                .with_attribute(VertexAttribute::position())
                .with_attribute(VertexAttribute::normal())
                .with_attribute(VertexAttribute::texcoord0())
                .with_label("position_normal_uv"),
        )
    }

    /// Tangent-space layout: position, normal, tangent, binormal, texcoord (14 floats).
    pub fn tangent_space() -> Arc<Self> {
        Arc::new(
            Self::new()
                .with_attribute(VertexAttribute::position())
                .with_attribute(VertexAttribute::normal())
                .with_attribute(VertexAttribute::tangent())
                .with_attribute(VertexAttribute::binormal())
                .with_attribute(VertexAttribute::texcoord0())
                .with_label("tangent_space"),
        )
    }
}
