//! Intermediate representation for the botforge part composition engine.
//!
//! This crate defines the declarative scene tree that the engine emits and a
//! renderer consumes. It is purely descriptive: primitive shapes with their
//! parameters, local transforms and material descriptors. No mesh data lives
//! here; turning the tree into draw calls is the renderer adapter's job.
//!
//! Conventions follow the common Y-up, right-handed frame: +Y is up, +Z points
//! out of the robot's face towards the viewer, and rotations are Euler angles
//! in radians in XYZ order (composed as `Rx * Ry * Rz`).

use serde::{Deserialize, Serialize};

/// 3D vector with f64 components (scene units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// All components zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All components one.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a new Vec3.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise product.
    pub fn mul(self, other: Vec3) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Components as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A coordinate axis, used to pick a mirror plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Mirror across the YZ plane (negate X).
    X,
    /// Mirror across the XZ plane (negate Y).
    Y,
    /// Mirror across the XY plane (negate Z).
    Z,
}

/// Primitive shape — the leaf vocabulary of the scene tree.
///
/// Round primitives are built around the Y axis (cylinder, cone, capsule,
/// dome). Flat primitives (plane, circle, torus) lie in the XY plane facing
/// +Z. [`SceneNode::mirrored`] keeps primitives as they are, so it is exact
/// only for primitives that are symmetric under the same reflection in their
/// own frame (see [`Primitive::is_mirror_symmetric`]). Torus arcs start on
/// +X, so only a half ring (π) or a full ring (τ) survives an [`Axis::X`]
/// mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Primitive {
    /// Axis-aligned box centered at origin.
    Box {
        /// Size along each axis.
        size: Vec3,
    },
    /// Sphere centered at origin.
    Sphere {
        /// Radius of the sphere.
        radius: f64,
        /// Number of segments around the equator (0 = renderer default).
        segments: u32,
    },
    /// Upper hemisphere centered at origin, open at the bottom.
    Dome {
        /// Radius of the hemisphere.
        radius: f64,
        /// Number of segments around the rim.
        segments: u32,
    },
    /// Tapered cylinder along the Y axis, centered at origin.
    Cylinder {
        /// Radius of the top cap.
        radius_top: f64,
        /// Radius of the bottom cap.
        radius_bottom: f64,
        /// Height of the cylinder.
        height: f64,
        /// Number of radial segments.
        segments: u32,
    },
    /// Cone along the Y axis, apex up, centered at origin.
    Cone {
        /// Base radius.
        radius: f64,
        /// Height of the cone.
        height: f64,
        /// Number of radial segments.
        segments: u32,
    },
    /// Torus (or torus arc) in the XY plane.
    ///
    /// The arc starts on +X and sweeps counterclockwise through +Y, so an arc
    /// of π is an upward-bulging half ring.
    Torus {
        /// Distance from the torus center to the tube center.
        radius: f64,
        /// Radius of the tube.
        tube: f64,
        /// Swept angle in radians (`TAU` for a full ring).
        arc: f64,
        /// Number of tubular segments.
        segments: u32,
    },
    /// Capsule along the Y axis, centered at origin.
    Capsule {
        /// Radius of the hemispherical caps.
        radius: f64,
        /// Length of the straight section between the caps.
        length: f64,
        /// Number of radial segments.
        segments: u32,
    },
    /// Rectangle in the XY plane facing +Z.
    Plane {
        /// Extent along X.
        width: f64,
        /// Extent along Y.
        height: f64,
    },
    /// Disc in the XY plane facing +Z.
    Circle {
        /// Radius of the disc.
        radius: f64,
        /// Number of rim segments.
        segments: u32,
    },
    /// Regular octahedron centered at origin.
    Octahedron {
        /// Circumscribed radius.
        radius: f64,
    },
}

impl Primitive {
    /// Short lowercase name of the primitive kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Box { .. } => "box",
            Primitive::Sphere { .. } => "sphere",
            Primitive::Dome { .. } => "dome",
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::Cone { .. } => "cone",
            Primitive::Torus { .. } => "torus",
            Primitive::Capsule { .. } => "capsule",
            Primitive::Plane { .. } => "plane",
            Primitive::Circle { .. } => "circle",
            Primitive::Octahedron { .. } => "octahedron",
        }
    }

    /// Whether the shape is unchanged by reflection across the plane normal
    /// to `axis` in its own frame.
    ///
    /// Flat shapes facing +Z would turn their back to the viewer under an
    /// [`Axis::Z`] mirror and count as asymmetric there.
    pub fn is_mirror_symmetric(&self, axis: Axis) -> bool {
        const ARC_EPS: f64 = 1e-9;
        let near = |a: f64, b: f64| (a - b).abs() <= ARC_EPS;
        match *self {
            Primitive::Box { .. }
            | Primitive::Sphere { .. }
            | Primitive::Capsule { .. }
            | Primitive::Octahedron { .. } => true,
            Primitive::Dome { .. } | Primitive::Cone { .. } => axis != Axis::Y,
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                ..
            } => axis != Axis::Y || radius_top == radius_bottom,
            Primitive::Plane { .. } | Primitive::Circle { .. } => axis != Axis::Z,
            Primitive::Torus { arc, .. } => match axis {
                Axis::X => near(arc, std::f64::consts::PI) || near(arc, std::f64::consts::TAU),
                Axis::Y => near(arc, std::f64::consts::TAU),
                Axis::Z => true,
            },
        }
    }

    /// Whether every dimension is finite and strictly positive.
    ///
    /// Torus arcs must also lie in `(0, TAU]`.
    pub fn is_well_formed(&self) -> bool {
        fn pos(v: f64) -> bool {
            v.is_finite() && v > 0.0
        }
        match *self {
            Primitive::Box { size } => pos(size.x) && pos(size.y) && pos(size.z),
            Primitive::Sphere { radius, .. } | Primitive::Dome { radius, .. } => pos(radius),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                radius_top.is_finite()
                    && radius_top >= 0.0
                    && pos(radius_bottom.max(radius_top))
                    && radius_bottom >= 0.0
                    && pos(height)
            }
            Primitive::Cone { radius, height, .. } => pos(radius) && pos(height),
            Primitive::Torus {
                radius, tube, arc, ..
            } => pos(radius) && pos(tube) && pos(arc) && arc <= std::f64::consts::TAU + 1e-9,
            Primitive::Capsule { radius, length, .. } => {
                pos(radius) && length.is_finite() && length >= 0.0
            }
            Primitive::Plane { width, height } => pos(width) && pos(height),
            Primitive::Circle { radius, .. } => pos(radius),
            Primitive::Octahedron { radius } => pos(radius),
        }
    }
}

/// Local transform of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Euler rotation in radians, XYZ order.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Same transform with a different rotation.
    pub const fn rotated(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    /// Same transform with a different scale.
    pub const fn scaled(mut self, x: f64, y: f64, z: f64) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Reflect this transform across the plane normal to `axis`.
    ///
    /// The position component on `axis` is negated. For the rotation, a
    /// reflection conjugates each elementary rotation: the angle about the
    /// mirror axis is kept and the other two angles change sign. Scale is
    /// unchanged, so no node ever gets a negative determinant.
    pub fn mirrored(&self, axis: Axis) -> Self {
        let p = self.position;
        let r = self.rotation;
        let (position, rotation) = match axis {
            Axis::X => (Vec3::new(-p.x, p.y, p.z), Vec3::new(r.x, -r.y, -r.z)),
            Axis::Y => (Vec3::new(p.x, -p.y, p.z), Vec3::new(-r.x, r.y, -r.z)),
            Axis::Z => (Vec3::new(p.x, p.y, -p.z), Vec3::new(-r.x, -r.y, r.z)),
        };
        Self {
            position,
            rotation,
            scale: self.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Physically based material descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Finish name (e.g. "chassis", "panel").
    pub name: String,
    /// Base color as `[r, g, b]` in 0.0..1.0 (sRGB).
    pub color: [f64; 3],
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metallic: f64,
    /// Roughness factor (0.0 = mirror, 1.0 = diffuse).
    pub roughness: f64,
    /// Clearcoat layer strength.
    pub clearcoat: f64,
    /// Clearcoat layer roughness.
    pub clearcoat_roughness: f64,
    /// Emissive color, if the finish glows.
    pub emissive: Option<[f64; 3]>,
    /// Emissive intensity multiplier.
    pub emissive_intensity: f64,
    /// Opacity (1.0 = opaque).
    pub opacity: f64,
    /// Render both faces.
    pub double_sided: bool,
}

impl MaterialDef {
    /// Opaque dielectric with the given name and color.
    pub fn plain(name: impl Into<String>, color: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            color,
            metallic: 0.0,
            roughness: 0.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            emissive: None,
            emissive_intensity: 0.0,
            opacity: 1.0,
            double_sided: false,
        }
    }
}

/// A primitive with its material: the drawable payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Shape to draw.
    pub primitive: Primitive,
    /// Material to draw it with.
    pub material: MaterialDef,
}

/// Marks the root of a styled part subtree (e.g. the head, style 2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTag {
    /// Role of the subtree ("head", "neck", "arm", "accessory", ...).
    pub role: String,
    /// Style index of the variant that produced it, if styled.
    pub style: Option<usize>,
}

/// A node in the scene tree.
///
/// A node may carry a mesh, children, or both. Children inherit the node's
/// transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Node name, unique among siblings by convention.
    pub name: String,
    /// Local transform.
    #[serde(default)]
    pub transform: Transform,
    /// Part marker for styled subtrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<PartTag>,
    /// Drawable payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Mesh>,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty group node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            tag: None,
            mesh: None,
            children: Vec::new(),
        }
    }

    /// Leaf node drawing `primitive` with `material`.
    pub fn mesh(name: impl Into<String>, primitive: Primitive, material: MaterialDef) -> Self {
        Self {
            mesh: Some(Mesh {
                primitive,
                material,
            }),
            ..Self::group(name)
        }
    }

    /// Replace the local transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the local translation.
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.position = Vec3::new(x, y, z);
        self
    }

    /// Set the local rotation (radians).
    pub fn rotated(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.rotation = Vec3::new(x, y, z);
        self
    }

    /// Set the local scale.
    pub fn scaled(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.scale = Vec3::new(x, y, z);
        self
    }

    /// Attach a part marker.
    pub fn tagged(mut self, role: impl Into<String>, style: Option<usize>) -> Self {
        self.tag = Some(PartTag {
            role: role.into(),
            style,
        });
        self
    }

    /// Append a child and return self.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append children and return self.
    pub fn with_children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a child.
    pub fn push(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Direct child by name.
    pub fn child(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First node named `name` in depth-first pre-order, including self.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.walk().find(|n| n.name == name)
    }

    /// Mutable variant of [`SceneNode::find`].
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Depth-first pre-order iterator over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of nodes that carry a mesh.
    pub fn mesh_count(&self) -> usize {
        self.walk().filter(|n| n.mesh.is_some()).count()
    }

    /// Nodes whose tag has the given role.
    pub fn tagged_nodes<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a SceneNode> + 'a {
        self.walk()
            .filter(move |n| n.tag.as_ref().is_some_and(|t| t.role == role))
    }

    /// Deep copy reflected across the plane normal to `axis`.
    ///
    /// Every transform in the subtree is mirrored; primitives, arguments and
    /// materials are kept as they are. The result is an exact reflection only
    /// when every primitive in the subtree passes
    /// [`Primitive::is_mirror_symmetric`] for `axis`.
    pub fn mirrored(&self, axis: Axis) -> SceneNode {
        if let Some(mesh) = &self.mesh {
            debug_assert!(
                mesh.primitive.is_mirror_symmetric(axis),
                "{} ({}) is not symmetric across {axis:?}",
                self.name,
                mesh.primitive.kind()
            );
        }
        SceneNode {
            name: self.name.clone(),
            transform: self.transform.mirrored(axis),
            tag: self.tag.clone(),
            mesh: self.mesh.clone(),
            children: self.children.iter().map(|c| c.mirrored(axis)).collect(),
        }
    }
}

/// Iterator returned by [`SceneNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A botforge document: one assembled scene tree plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Root of the assembled scene.
    pub root: SceneNode,
}

impl Document {
    /// Wrap a scene tree in a document.
    pub fn new(root: SceneNode) -> Self {
        Self {
            version: "0.1".to_string(),
            root,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
