//! Renderer adapter: flattens a scene tree into world-space draw calls.

use botforge_ir::{MaterialDef, Primitive, SceneNode, Transform as Local};
use botforge_math::Transform;

use crate::catalog::shape::octahedron;
use crate::palette::{Finish, Palette};

/// One primitive to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Slash-separated node names from the root, e.g. `robot/head/eye_left/pupil`.
    pub path: String,
    /// Shape in its local frame.
    pub primitive: Primitive,
    /// Material.
    pub material: MaterialDef,
    /// Local-to-world matrix.
    pub world: Transform,
}

/// Something that can draw primitives.
pub trait Renderer {
    /// Draw one primitive.
    fn draw(&mut self, call: &DrawCall);
}

/// Local matrix of a node transform (`T * R * S`).
pub fn local_matrix(t: &Local) -> Transform {
    Transform::from_trs(t.position.to_array(), t.rotation.to_array(), t.scale.to_array())
}

/// Every mesh in `root`, pre-order, with world matrices.
///
/// A malformed primitive is replaced by a small magenta octahedron so the
/// problem stays visible without breaking the frame.
pub fn flatten(root: &SceneNode) -> Vec<DrawCall> {
    let mut out = Vec::with_capacity(root.mesh_count());
    visit(root, &Transform::identity(), "", &mut out);
    out
}

fn visit(node: &SceneNode, parent: &Transform, prefix: &str, out: &mut Vec<DrawCall>) {
    let world = parent.then(&local_matrix(&node.transform));
    let path = if prefix.is_empty() {
        node.name.clone()
    } else {
        format!("{prefix}/{}", node.name)
    };

    if let Some(mesh) = &node.mesh {
        let call = if mesh.primitive.is_well_formed() && world.is_finite() {
            DrawCall {
                path: path.clone(),
                primitive: mesh.primitive.clone(),
                material: mesh.material.clone(),
                world: world.clone(),
            }
        } else {
            tracing::warn!(path = %path, kind = mesh.primitive.kind(), "malformed primitive, drawing placeholder");
            DrawCall {
                path: path.clone(),
                primitive: octahedron(0.05),
                material: Palette::standard().resolve(Finish::Fallback, None),
                world: if world.is_finite() {
                    world.clone()
                } else {
                    Transform::identity()
                },
            }
        };
        out.push(call);
    }

    for child in &node.children {
        visit(child, &world, &path, out);
    }
}

/// Flatten `root` and hand every draw call to `renderer`. Returns the count.
pub fn submit<R: Renderer + ?Sized>(renderer: &mut R, root: &SceneNode) -> usize {
    let calls = flatten(root);
    for call in &calls {
        renderer.draw(call);
    }
    tracing::debug!(calls = calls.len(), "frame submitted");
    calls.len()
}
