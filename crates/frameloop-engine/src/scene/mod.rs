//! Scene-side contracts the loop relies on.
//!
//! The loop does not traverse the scene. It only needs:
//! - a container with a replaceable `camera` slot
//! - a capability check telling whether a node can act as a camera
//! - a way to update a camera's aspect and projection on resize

mod camera;
mod container;

use std::cell::RefCell;
use std::rc::Rc;

pub use camera::{Camera, Mat4, PerspectiveCamera};
pub use container::Scene;

/// Anything that can be placed in a scene.
///
/// A node advertises the camera capability by returning `Some` from
/// [`as_camera`](Self::as_camera).
pub trait SceneObject: 'static {
    fn as_camera(&self) -> Option<&dyn Camera> {
        None
    }
}

/// Shared, mutable handle to a scene node.
pub type NodeRef = Rc<RefCell<dyn SceneObject>>;

/// Identity comparison between two node handles, regardless of their static types.
pub fn same_node<A, B>(a: &Rc<A>, b: &Rc<B>) -> bool
where
    A: ?Sized,
    B: ?Sized,
{
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
