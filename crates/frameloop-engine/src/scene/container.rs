use crate::coords::ColorRgba;

use super::{same_node, NodeRef};

/// Scene container.
///
/// `camera` is the camera used for rendering. Clients may replace it with any
/// node; the application validates it before every render and falls back to
/// its default camera if the node is not a camera.
pub struct Scene {
    pub camera: Option<NodeRef>,
    pub background: ColorRgba,
    children: Vec<NodeRef>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            camera: None,
            background: ColorRgba::black(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, node: NodeRef) {
        self.children.push(node);
    }

    /// Removes `node` (by identity). Returns whether it was present.
    pub fn remove(&mut self, node: &NodeRef) -> bool {
        let before = self.children.len();
        self.children.retain(|child| !same_node(child, node));
        self.children.len() != before
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("has_camera", &self.camera.is_some())
            .field("background", &self.background)
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::scene::{PerspectiveCamera, SceneObject};

    struct Marker;
    impl SceneObject for Marker {}

    #[test]
    fn remove_matches_by_identity() {
        let mut scene = Scene::new();
        let a: NodeRef = Rc::new(RefCell::new(Marker));
        let b: NodeRef = Rc::new(RefCell::new(Marker));
        scene.add(a.clone());

        assert!(!scene.remove(&b));
        assert!(scene.remove(&a));
        assert!(scene.children().is_empty());
    }

    #[test]
    fn camera_capability_is_advertised() {
        let camera: NodeRef = Rc::new(RefCell::new(PerspectiveCamera::default()));
        let marker: NodeRef = Rc::new(RefCell::new(Marker));

        assert!(camera.borrow().as_camera().is_some());
        assert!(marker.borrow().as_camera().is_none());
    }
}
