//! Spatial entity contract
//!
//! Actions mutate external entities through the [`Target`] trait: three
//! transform channels (position, rotation, scale) plus a stable identity
//! the manager can use as a lookup key. Entities are shared with the host
//! behind `Rc<RefCell<..>>`; running actions hold only weak references, so
//! dropping an entity on the host side retires its actions instead of
//! keeping it alive.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nalgebra_glm as glm;

/// Stable identity of a spatial entity, usable as a lookup key.
pub type TargetId = u64;

/// A spatial entity an action can mutate.
pub trait Target {
    /// Stable identity; must not change for the entity's lifetime.
    fn target_id(&self) -> TargetId;

    /// Current position.
    fn position(&self) -> glm::Vec3;

    /// Overwrite the position.
    fn set_position(&mut self, position: glm::Vec3);

    /// Current rotation (Euler angles, degrees per axis).
    fn rotation(&self) -> glm::Vec3;

    /// Overwrite the rotation.
    fn set_rotation(&mut self, rotation: glm::Vec3);

    /// Current scale.
    fn scale(&self) -> glm::Vec3;

    /// Overwrite the scale.
    fn set_scale(&mut self, scale: glm::Vec3);
}

/// Shared handle to a target, as held by the host.
pub type SharedTarget = Rc<RefCell<dyn Target>>;

/// Weak handle to a target, as held by running actions and records.
pub type WeakTarget = Weak<RefCell<dyn Target>>;

/// Basic transform node for hosts that do not bring their own entity type.
///
/// Used by the demo driver and throughout the test suite.
#[derive(Debug, Clone)]
pub struct Node {
    id: TargetId,
    /// Current position.
    pub position: glm::Vec3,
    /// Current rotation (Euler angles, degrees per axis).
    pub rotation: glm::Vec3,
    /// Current scale.
    pub scale: glm::Vec3,
}

impl Node {
    /// Create a node at the origin with identity scale.
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            position: glm::vec3(0.0, 0.0, 0.0),
            rotation: glm::vec3(0.0, 0.0, 0.0),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }

    /// Create a node already wrapped for sharing with the engine.
    pub fn shared(id: TargetId) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(id)))
    }
}

impl Target for Node {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn position(&self) -> glm::Vec3 {
        self.position
    }

    fn set_position(&mut self, position: glm::Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> glm::Vec3 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: glm::Vec3) {
        self.rotation = rotation;
    }

    fn scale(&self) -> glm::Vec3 {
        self.scale
    }

    fn set_scale(&mut self, scale: glm::Vec3) {
        self.scale = scale;
    }
}
