//! Material node graphs: the closed node set, link validation, and per-pixel evaluation.

pub mod compile;
pub mod graph;
pub mod material;

pub use compile::{Bsdf, CompiledShader, ShadingInputs};
pub use graph::{
    ColorRamp, GradientKind, GraphNode, InputSocket, Link, NodeId, OutputSocket,
    RampInterpolation, RampStop, ShaderGraph, ShaderNode, SocketType, SurfaceParams,
};
pub use material::{Material, MaterialId};
