//! Shared helpers for the graphics integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use starmesh_core::material::{BlendingAttribute, Material};
use starmesh_core::math::{Vec3, mat4_translation};
use starmesh_core::mesh::{PrimitiveTopology, VertexUsage};
use starmesh_core::model::{Model, ModelBuilder};
use starmesh_graphics::{Camera, Renderable, Shader};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What a [`RecordingShader`] saw, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Begin(&'static str),
    Draw {
        shader: &'static str,
        material: String,
        position: Vec3,
        lights: usize,
    },
    End(&'static str),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Records every call into a shared log.
pub struct RecordingShader {
    pub name: &'static str,
    pub log: EventLog,
    /// `Some(b)` restricts the shader to renderables whose blending is `b`.
    pub blended: Option<bool>,
}

impl RecordingShader {
    pub fn boxed(name: &'static str, log: &EventLog) -> Box<dyn Shader> {
        Box::new(Self {
            name,
            log: Rc::clone(log),
            blended: None,
        })
    }

    pub fn boxed_for(name: &'static str, log: &EventLog, blended: bool) -> Box<dyn Shader> {
        Box::new(Self {
            name,
            log: Rc::clone(log),
            blended: Some(blended),
        })
    }
}

impl Shader for RecordingShader {
    fn can_render(&self, renderable: &Renderable) -> bool {
        self.blended.is_none_or(|b| b == renderable.is_blended())
    }

    fn begin(&mut self, _camera: &Camera) {
        self.log.borrow_mut().push(Event::Begin(self.name));
    }

    fn render(&mut self, renderable: &Renderable) {
        self.log.borrow_mut().push(Event::Draw {
            shader: self.name,
            material: renderable
                .material
                .as_ref()
                .map(|m| m.id.clone())
                .unwrap_or_default(),
            position: mat4_translation(&renderable.world_transform),
            lights: renderable
                .environment
                .as_ref()
                .map_or(0, |e| e.directional_lights.len()),
        });
    }

    fn end(&mut self) {
        self.log.borrow_mut().push(Event::End(self.name));
    }
}

/// Positions of the draws in `log`, in order.
pub fn drawn_positions(log: &EventLog) -> Vec<Vec3> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Draw { position, .. } => Some(*position),
            _ => None,
        })
        .collect()
}

pub fn opaque(id: &str) -> Arc<Material> {
    Arc::new(Material::new(id))
}

pub fn blended(id: &str) -> Arc<Material> {
    Arc::new(Material::new(id).with_blending(BlendingAttribute::new(0.5)))
}

/// A unit box model centered on its origin.
pub fn box_model(material: Arc<Material>) -> Arc<Model> {
    let model = ModelBuilder::new()
        .create_box(
            1.0,
            1.0,
            1.0,
            PrimitiveTopology::TriangleList,
            material,
            VertexUsage::POSITION | VertexUsage::NORMAL,
        )
        .unwrap();
    Arc::new(model)
}
