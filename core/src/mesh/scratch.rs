//! Scoped scratch storage for composite shape emitters.
//!
//! Emitters such as [`arrow`](super::shapes::arrow) need a handful of
//! temporary vectors and matrices. They borrow them from a [`ScratchArena`]
//! through a [`ScratchScope`]; dropping the scope truncates the arena back to
//! where the scope started, so the arena never grows past the deepest
//! composite call while keeping its capacity for the next one.
//!
//! ```
//! use starmesh_core::math::Vec3;
//! use starmesh_core::mesh::ScratchArena;
//!
//! let mut arena = ScratchArena::new();
//! {
//!     let mut scope = arena.scope();
//!     let up = scope.alloc_vec3(Vec3::y());
//!     assert_eq!(scope.vec3(up), Vec3::y());
//! }
//! assert!(arena.is_empty());
//! ```

use crate::math::{Mat4, Vec3};

/// Handle to a vector allocated in a [`ScratchScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vec3Slot(usize);

/// Handle to a matrix allocated in a [`ScratchScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mat4Slot(usize);

/// Reusable backing storage for scratch vectors and matrices.
#[derive(Debug, Default, Clone)]
pub struct ScratchArena {
    vec3s: Vec<Vec3>,
    mat4s: Vec<Mat4>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope; everything it allocates is released when it drops.
    pub fn scope(&mut self) -> ScratchScope<'_> {
        ScratchScope {
            vec3_mark: self.vec3s.len(),
            mat4_mark: self.mat4s.len(),
            arena: self,
        }
    }

    /// Whether no scope currently holds any allocation.
    pub fn is_empty(&self) -> bool {
        self.vec3s.is_empty() && self.mat4s.is_empty()
    }

    /// Live allocations as `(vectors, matrices)`.
    pub fn len(&self) -> (usize, usize) {
        (self.vec3s.len(), self.mat4s.len())
    }

    /// Reserved capacity as `(vectors, matrices)`.
    pub fn capacity(&self) -> (usize, usize) {
        (self.vec3s.capacity(), self.mat4s.capacity())
    }
}

/// RAII guard over a [`ScratchArena`].
///
/// Slots are only valid while the scope that produced them is alive.
#[derive(Debug)]
pub struct ScratchScope<'a> {
    arena: &'a mut ScratchArena,
    vec3_mark: usize,
    mat4_mark: usize,
}

impl ScratchScope<'_> {
    pub fn alloc_vec3(&mut self, value: Vec3) -> Vec3Slot {
        self.arena.vec3s.push(value);
        Vec3Slot(self.arena.vec3s.len() - 1)
    }

    pub fn alloc_mat4(&mut self, value: Mat4) -> Mat4Slot {
        self.arena.mat4s.push(value);
        Mat4Slot(self.arena.mat4s.len() - 1)
    }

    pub fn vec3(&self, slot: Vec3Slot) -> Vec3 {
        self.arena.vec3s[slot.0]
    }

    pub fn vec3_mut(&mut self, slot: Vec3Slot) -> &mut Vec3 {
        &mut self.arena.vec3s[slot.0]
    }

    pub fn mat4(&self, slot: Mat4Slot) -> Mat4 {
        self.arena.mat4s[slot.0]
    }

    pub fn mat4_mut(&mut self, slot: Mat4Slot) -> &mut Mat4 {
        &mut self.arena.mat4s[slot.0]
    }

    /// Open a nested scope released before this one.
    pub fn nested(&mut self) -> ScratchScope<'_> {
        self.arena.scope()
    }
}

impl Drop for ScratchScope<'_> {
    fn drop(&mut self) {
        self.arena.vec3s.truncate(self.vec3_mark);
        self.arena.mat4s.truncate(self.mat4_mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_releases_on_drop() {
        let mut arena = ScratchArena::new();
        {
            let mut scope = arena.scope();
            let v = scope.alloc_vec3(Vec3::x());
            let m = scope.alloc_mat4(Mat4::identity());
            *scope.vec3_mut(v) *= 2.0;
            assert_eq!(scope.vec3(v), Vec3::new(2.0, 0.0, 0.0));
            assert_eq!(scope.mat4(m), Mat4::identity());
        }
        assert!(arena.is_empty());
        assert!(arena.capacity().0 >= 1);
        assert!(arena.capacity().1 >= 1);
    }

    #[test]
    fn test_nested_scopes() {
        let mut arena = ScratchArena::new();
        let mut outer = arena.scope();
        let a = outer.alloc_vec3(Vec3::x());
        {
            let mut inner = outer.nested();
            inner.alloc_vec3(Vec3::y());
            inner.alloc_vec3(Vec3::z());
        }
        let b = outer.alloc_vec3(Vec3::z());
        assert_eq!(outer.vec3(a), Vec3::x());
        assert_eq!(b, Vec3Slot(1));
        drop(outer);
        assert_eq!(arena.len(), (0, 0));
    }
}
