//! In-process scene: objects, materials and render hooks the pipeline rebuilds on every call.

pub mod hooks;
pub mod mesh;
pub mod world;

pub use hooks::{ProgressCallback, ProgressHooks, ProgressSubscription};
pub use mesh::{Mesh, TorusParams};
pub use world::{
    CameraData, DepthOfField, LightData, MeshData, ObjectData, ObjectId, ObjectKind, Scene,
    SceneObject, World,
};
