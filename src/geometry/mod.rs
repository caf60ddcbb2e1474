//! Planar geometry: vector helpers, polygon vertex loops and edge-normal axes.

pub mod axes;
pub mod vector;
pub mod vertices;

pub use vector::Vector;
pub use vertices::Vertex;
