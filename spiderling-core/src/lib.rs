//! Spiderling Core Library - OBJ model loading and mesh assembly
//!
//! This library turns Wavefront OBJ text into a flat list of triangles with
//! resolved per-corner attributes, and provides the camera and transform math
//! used to draw it under the different display modes.

pub mod assembler;
pub mod display;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod obj;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use assembler::{LoadedModel, MeshLoader, Pool};
pub use display::{DisplayMode, Primitive};
pub use error::{Attribute, LoadError, LoadWarning, ParseError};
pub use geometry::{Bounds, Mesh, Triangle, Vec2, Vec3, Vertex};
pub use loader::{check_format, load_from_reader, load_model, LoadOptions};
pub use obj::{CornerFormat, Record, RecordParser};
pub use projection::Camera;
pub use transform::Transform;
