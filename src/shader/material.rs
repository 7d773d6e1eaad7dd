use crate::foundation::core::RgbaColor;
use crate::shader::graph::{ShaderGraph, SurfaceParams};

/// Handle to a material stored in a [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u64);

/// Surface description attached to mesh material slots.
///
/// With `use_nodes` off the renderer shades with `diffuse_color`; with it on, the node graph
/// decides.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub use_nodes: bool,
    pub diffuse_color: RgbaColor,
    pub graph: ShaderGraph,
}

impl Material {
    /// New material seeded with the default node set: a surface shader wired into an output
    /// sink. Node shading starts disabled.
    pub fn new(name: impl Into<String>) -> Self {
        let params = SurfaceParams::default();
        Self {
            name: name.into(),
            use_nodes: false,
            diffuse_color: params.base_color,
            graph: ShaderGraph::surface_output(params),
        }
    }
}
