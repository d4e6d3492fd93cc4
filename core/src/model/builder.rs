//! Model assembly.
//!
//! [`ModelBuilder`] collects nodes and their parts into a [`Model`]. Parts
//! built through [`ModelBuilder::part`] share one [`MeshBuilder`] per vertex
//! layout until that builder passes the configured vertex margin, so a
//! model with many small parts ends up with few meshes.

use std::sync::Arc;

use crate::error::{MeshError, MeshResult};
use crate::material::Material;
use crate::mesh::{
    BuilderConfig, BuiltMesh, Mesh, MeshBuilder, MeshPart, PartHandle, PrimitiveTopology, VertexLayout,
    VertexSink, VertexUsage,
};

use super::data::{Model, rebuild_references};
use super::node::{Node, NodePart};
use super::part::PartBuilder;

/// Model assembler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// A builder holding this many vertices or more is not reused for new
    /// parts.
    pub vertex_margin: u32,
    /// Configuration for every mesh builder the assembler opens.
    pub builder: BuilderConfig,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            vertex_margin: (i32::MAX / 2) as u32,
            builder: BuilderConfig::default(),
        }
    }
}

impl AssemblerConfig {
    #[must_use]
    pub fn with_vertex_margin(mut self, vertex_margin: u32) -> Self {
        self.vertex_margin = vertex_margin;
        self
    }

    #[must_use]
    pub fn with_builder(mut self, builder: BuilderConfig) -> Self {
        self.builder = builder;
        self
    }
}

#[derive(Debug)]
enum PartSlot {
    Ready(NodePart),
    Pending {
        builder: usize,
        handle: PartHandle,
        material: Arc<Material>,
    },
}

/// Builds a [`Model`] node by node.
///
/// Between [`begin`](Self::begin) and [`end`](Self::end) the assembler has a
/// current node; parts are appended to it, and one is created on demand if
/// no node was added yet.
#[derive(Debug)]
pub struct ModelBuilder {
    config: AssemblerConfig,
    model: Option<Model>,
    slots: Vec<Vec<PartSlot>>,
    current: Option<usize>,
    builders: Vec<MeshBuilder>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::with_config(AssemblerConfig::default())
    }

    pub fn with_config(config: AssemblerConfig) -> Self {
        Self {
            config,
            model: None,
            slots: Vec::new(),
            current: None,
            builders: Vec::new(),
        }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn is_building(&self) -> bool {
        self.model.is_some()
    }

    /// Start a new model.
    pub fn begin(&mut self) -> MeshResult<()> {
        if self.model.is_some() {
            return Err(MeshError::AlreadyBuilding);
        }
        self.model = Some(Model::new());
        self.slots.clear();
        self.current = None;
        self.builders.clear();
        Ok(())
    }

    /// Drop the model being built without producing it.
    pub fn cancel(&mut self) {
        self.model = None;
        self.slots.clear();
        self.current = None;
        self.builders.clear();
    }

    fn model_mut(&mut self) -> MeshResult<&mut Model> {
        self.model.as_mut().ok_or(MeshError::NotBuilding)
    }

    /// Finish the model.
    ///
    /// Ends every mesh builder, resolves the parts built through them,
    /// rebuilds the model's registries and computes node transforms.
    pub fn end(&mut self) -> MeshResult<Model> {
        crate::profile_function!();
        let mut model = self.model.take().ok_or(MeshError::NotBuilding)?;
        self.current = None;

        let mut built: Vec<BuiltMesh> = Vec::with_capacity(self.builders.len());
        for mut builder in self.builders.drain(..) {
            match builder.end() {
                Ok(mesh) => built.push(mesh),
                Err(e) => {
                    self.slots.clear();
                    return Err(e);
                }
            }
        }

        for (node, slots) in model.nodes.iter_mut().zip(self.slots.drain(..)) {
            for slot in slots {
                match slot {
                    PartSlot::Ready(part) => node.parts.push(part),
                    PartSlot::Pending {
                        builder,
                        handle,
                        material,
                    } => {
                        if let Some(mesh_part) = built.get(builder).and_then(|b| b.part(handle)) {
                            node.parts.push(NodePart::new(Arc::clone(mesh_part), material));
                        }
                    }
                }
            }
        }

        rebuild_references(&mut model);
        model.calculate_transforms();
        log::debug!(
            "assembled model: {} nodes, {} meshes, {} parts",
            model.nodes.len(),
            model.meshes.len(),
            model.mesh_parts.len()
        );
        Ok(model)
    }

    /// Append `node` to the model and make it current.
    pub fn node_with(&mut self, node: Node) -> MeshResult<&mut Node> {
        let model = self.model.as_mut().ok_or(MeshError::NotBuilding)?;
        model.nodes.push(node);
        self.slots.push(Vec::new());
        let index = model.nodes.len() - 1;
        self.current = Some(index);
        Ok(&mut model.nodes[index])
    }

    /// Append an empty node with id `node<n>`, where `n` is the node count
    /// including the new one.
    pub fn node(&mut self) -> MeshResult<&mut Node> {
        let count = self.model_mut()?.nodes.len();
        self.node_with(Node::new(format!("node{}", count + 1)))
    }

    /// Append a node whose children are the nodes of `model`.
    ///
    /// Meshes managed by `model` become managed by the model being built.
    pub fn node_from_model(&mut self, id: impl Into<String>, mut model: Model) -> MeshResult<&mut Node> {
        let managed = model.take_managed();
        let target = self.model_mut()?;
        for mesh in managed {
            target.manage(mesh);
        }
        let mut node = Node::new(id);
        node.children = std::mem::take(&mut model.nodes);
        self.node_with(node)
    }

    /// Make the model being built responsible for `mesh`.
    pub fn manage(&mut self, mesh: Arc<Mesh>) -> MeshResult<()> {
        self.model_mut()?.manage(mesh);
        Ok(())
    }

    fn current_node(&mut self) -> MeshResult<usize> {
        match self.current {
            Some(index) => Ok(index),
            None => {
                self.node()?;
                self.current.ok_or(MeshError::NotBuilding)
            }
        }
    }

    /// Add an existing mesh part to the current node.
    pub fn part_existing(&mut self, mesh_part: Arc<MeshPart>, material: Arc<Material>) -> MeshResult<()> {
        let node = self.current_node()?;
        self.slots[node].push(PartSlot::Ready(NodePart::new(mesh_part, material)));
        Ok(())
    }

    /// Add a window of an existing mesh to the current node.
    pub fn part_from_mesh(
        &mut self,
        id: impl Into<String>,
        mesh: Arc<Mesh>,
        topology: PrimitiveTopology,
        offset: usize,
        size: usize,
        material: Arc<Material>,
    ) -> MeshResult<Arc<MeshPart>> {
        let part = Arc::new(MeshPart::new(id, topology, mesh, offset, size)?);
        self.part_existing(Arc::clone(&part), material)?;
        Ok(part)
    }

    /// Open a new part in the current node and return a [`PartBuilder`]
    /// writing into it.
    ///
    /// Only one part can be built at a time: the next call to `part` may
    /// open its part in the same underlying mesh builder.
    pub fn part(
        &mut self,
        id: impl Into<String>,
        topology: PrimitiveTopology,
        layout: Arc<VertexLayout>,
        material: Arc<Material>,
    ) -> MeshResult<PartBuilder<'_>> {
        let node = self.current_node()?;
        let builder = self.builder_for(layout, topology)?;
        let handle = self.builders[builder].part(id, topology)?;
        self.slots[node].push(PartSlot::Pending {
            builder,
            handle,
            material,
        });
        Ok(PartBuilder::new(&mut self.builders[builder]))
    }

    /// [`part`](Self::part) with a layout built from a usage mask.
    pub fn part_usage(
        &mut self,
        id: impl Into<String>,
        topology: PrimitiveTopology,
        usage: VertexUsage,
        material: Arc<Material>,
    ) -> MeshResult<PartBuilder<'_>> {
        self.part(id, topology, VertexLayout::from_usage(usage), material)
    }

    /// Number of mesh builders opened for the current model.
    pub fn builder_count(&self) -> usize {
        self.builders.len()
    }

    fn builder_for(&mut self, layout: Arc<VertexLayout>, topology: PrimitiveTopology) -> MeshResult<usize> {
        let margin = self.config.vertex_margin as usize;
        let mut full = false;
        for (i, b) in self.builders.iter().enumerate() {
            if *b.layout() == *layout {
                if b.vertex_count() < margin {
                    return Ok(i);
                }
                full = true;
            }
        }
        if full {
            log::warn!(
                "mesh builder reached {} vertices, opening mesh {}",
                margin,
                self.builders.len() + 1
            );
        }
        let mut builder = MeshBuilder::with_config(self.config.builder.clone());
        builder.begin(layout, topology)?;
        self.builders.push(builder);
        Ok(self.builders.len() - 1)
    }
}
