//! CPU-side scene description for the Mars viewer.
//!
//! Holds the retained scene graph, cameras, materials, procedural star
//! generation, and analytic ray hit-testing. Nothing here touches the GPU;
//! `marsview-render` consumes these types to draw a frame.

pub mod camera;
pub mod color;
pub mod geometry;
pub mod graph;
pub mod image;
pub mod light;
pub mod material;
pub mod raycast;
pub mod shading;
pub mod starfield;

pub use camera::PerspectiveCamera;
pub use color::Color;
pub use geometry::{Geometry, SphereGeometry, SphereMesh};
pub use graph::{Node, NodeId, NodeKind, Renderable, SceneGraph, Transform};
pub use image::{ImageData, TextureHandle};
pub use light::Light;
pub use material::{
    BlendMode, Material, PointsMaterial, ShaderMaterial, ShaderProgram, Side, StandardMaterial,
};
pub use raycast::{Ray, RayHit, hit_test};
pub use starfield::{PointCloud, StarfieldGenerator};
