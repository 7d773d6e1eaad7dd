//! Scene-building stages run by the pipeline, in order: reset, geometry, material, rig.

pub mod geometry;
pub mod material;
pub mod reset;
pub mod rig;

pub use geometry::{TORUS, TORUS_LOCATION, TORUS_NAME, build_torus};
pub use material::{GRADIENT_MATERIAL_NAME, bind_gradient_material, build_gradient_graph};
pub use reset::{ResetReport, reset_scene};
pub use rig::{CameraPlacement, light_location, place_rig};
