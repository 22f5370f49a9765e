//! Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector2, Vector3};

/// Three floating-point components, used for normals
pub type Vec3 = Vector3<f32>;

/// Two floating-point components, used for texture coordinates
pub type Vec2 = Vector2<f32>;

/// A fully resolved triangle corner: position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vec3, texcoord: Vec2) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Degenerate triangles yield the zero vector.
    pub fn calculate_normal(&self) -> Vec3 {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }
}

/// Unit normal of the plane through three points, or zero when they are collinear
pub fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vec3 {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;

    edge1
        .cross(&edge2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::zeros)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere around `center()` enclosing the box
    pub fn radius(&self) -> f32 {
        self.extent().norm() / 2.0
    }

    fn include(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounding box over every corner position, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self
            .triangles
            .iter()
            .flat_map(|triangle| triangle.vertices.iter().map(|v| v.position));

        let first = positions.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for position in positions {
            bounds.include(&position);
        }
        Some(bounds)
    }

    /// Create a simple cube mesh, shown when no model file is given
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
            ([0.0, 0.0, -1.0], [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]]),
            ([0.0, 1.0, 0.0], [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
            ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
            ([1.0, 0.0, 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
            ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        for (normal, corners) in faces.iter() {
            let vertex = |i: usize| {
                let [x, y, z] = corners[i];
                Vertex::new(
                    Point3::new(x * half, y * half, z * half),
                    Vec3::new(normal[0], normal[1], normal[2]),
                    Vec2::new(uvs[i][0], uvs[i][1]),
                )
            };
            mesh.add_triangle(Triangle::new(vertex(0), vertex(1), vertex(2)));
            mesh.add_triangle(Triangle::new(vertex(0), vertex(2), vertex(3)));
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_twelve_outward_triangles() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.len(), 12);

        for triangle in &cube.triangles {
            let computed = triangle.calculate_normal();
            let declared = triangle.vertices[0].normal;
            assert!((computed - declared).norm() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let v = Vertex::new(Point3::new(1.0, 1.0, 1.0), Vec3::z(), Vec2::zeros());
        let triangle = Triangle::new(v, v, v);
        assert_eq!(triangle.calculate_normal(), Vec3::zeros());
    }

    #[test]
    fn test_bounds() {
        assert!(Mesh::new().bounds().is_none());

        let bounds = Mesh::cube(4.0).bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-2.0, -2.0, -2.0));
        assert_eq!(bounds.max, Point3::new(2.0, 2.0, 2.0));
        assert_eq!(bounds.center(), Point3::origin());
        assert!((bounds.radius() - 12.0_f32.sqrt()).abs() < 1e-6);
    }
}
