//! Display modes and the primitives a mesh is drawn with under each of them
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::geometry::{Mesh, Triangle, Vertex};

/// How the renderer interprets the triangle list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Solid,
    Wireframe,
    Points,
}

impl DisplayMode {
    /// Cycle Solid -> Wireframe -> Points -> Solid
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Solid => DisplayMode::Wireframe,
            DisplayMode::Wireframe => DisplayMode::Points,
            DisplayMode::Points => DisplayMode::Solid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Solid => "solid",
            DisplayMode::Wireframe => "wireframe",
            DisplayMode::Points => "points",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solid" | "fill" => Ok(DisplayMode::Solid),
            "wireframe" | "wire" | "lines" => Ok(DisplayMode::Wireframe),
            "points" | "point" => Ok(DisplayMode::Points),
            other => Err(format!(
                "unknown display mode '{}' (expected solid, wireframe or points)",
                other
            )),
        }
    }
}

/// A single drawable element borrowed from the mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Triangle([&'a Vertex; 3]),
    Line([&'a Vertex; 2]),
    Point(&'a Vertex),
}

impl Triangle {
    /// One filled triangle, its three edges, or its three corners
    pub fn primitives(&self, mode: DisplayMode) -> impl Iterator<Item = Primitive<'_>> {
        let [a, b, c] = &self.vertices;
        let emitted = match mode {
            DisplayMode::Solid => [Some(Primitive::Triangle([a, b, c])), None, None],
            DisplayMode::Wireframe => [
                Some(Primitive::Line([a, b])),
                Some(Primitive::Line([b, c])),
                Some(Primitive::Line([c, a])),
            ],
            DisplayMode::Points => [
                Some(Primitive::Point(a)),
                Some(Primitive::Point(b)),
                Some(Primitive::Point(c)),
            ],
        };
        emitted.into_iter().flatten()
    }
}

impl Mesh {
    /// Every primitive of the mesh under `mode`, in triangle order
    pub fn primitives(&self, mode: DisplayMode) -> impl Iterator<Item = Primitive<'_>> {
        self.triangles
            .iter()
            .flat_map(move |triangle| triangle.primitives(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_cycle() {
        let mut mode = DisplayMode::default();
        assert_eq!(mode, DisplayMode::Solid);
        mode = mode.next();
        assert_eq!(mode, DisplayMode::Wireframe);
        mode = mode.next();
        assert_eq!(mode, DisplayMode::Points);
        assert_eq!(mode.next(), DisplayMode::Solid);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Wire".parse::<DisplayMode>(), Ok(DisplayMode::Wireframe));
        assert_eq!("points".parse::<DisplayMode>(), Ok(DisplayMode::Points));
        assert!("shaded".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_primitive_counts_per_mode() {
        let mesh = Mesh::cube(1.0);
        let before = mesh.clone();

        let solid = mesh.primitives(DisplayMode::Solid).count();
        let wire = mesh.primitives(DisplayMode::Wireframe).count();
        let points = mesh.primitives(DisplayMode::Points).count();

        assert_eq!(solid, mesh.len());
        assert_eq!(wire, mesh.len() * 3);
        assert_eq!(points, mesh.len() * 3);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_wireframe_edges_close_the_triangle() {
        let mesh = Mesh::cube(1.0);
        let triangle = &mesh.triangles[0];
        let [a, b, c] = &triangle.vertices;
        let edges: Vec<_> = triangle.primitives(DisplayMode::Wireframe).collect();

        assert_eq!(
            edges,
            vec![
                Primitive::Line([a, b]),
                Primitive::Line([b, c]),
                Primitive::Line([c, a]),
            ]
        );
    }
}
