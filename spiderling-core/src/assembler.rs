//! Builds a triangle mesh from a stream of parsed records
use log::{debug, warn};
use nalgebra::Point3;

use crate::error::{Attribute, LoadWarning, ParseError};
use crate::geometry::{face_normal, Mesh, Triangle, Vec2, Vec3, Vertex};
use crate::obj::{Corner, Face, ParsedRecord, Record};

/// Append-only storage addressed by 1-based index
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Look up the `index`-th entry, counting from 1
    pub fn get(&self, index: i64) -> Option<&T> {
        if index < 1 {
            return None;
        }
        let slot = usize::try_from(index - 1).ok()?;
        self.items.get(slot)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The product of one load: the mesh and whatever was skipped on the way
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub mesh: Mesh,
    pub warnings: Vec<LoadWarning>,
}

/// Owns the attribute pools for the duration of one load.
///
/// Records are fed in file order. Vertex, normal and texture coordinate
/// records grow their pool; a face is resolved against the pools as they are
/// at that point and fan-triangulated into the mesh.
#[derive(Debug, Default)]
pub struct MeshLoader {
    positions: Pool<Point3<f32>>,
    normals: Pool<Vec3>,
    texcoords: Pool<Vec2>,
    mesh: Mesh,
    warnings: Vec<LoadWarning>,
}

impl MeshLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &Pool<Point3<f32>> {
        &self.positions
    }

    pub fn normals(&self) -> &Pool<Vec3> {
        &self.normals
    }

    pub fn texcoords(&self) -> &Pool<Vec2> {
        &self.texcoords
    }

    pub fn push_record(&mut self, parsed: ParsedRecord) {
        match parsed.record {
            Record::Vertex(position) => self.positions.push(position),
            Record::Normal(normal) => self.normals.push(normal),
            Record::TexCoord(texcoord) => self.texcoords.push(texcoord),
            Record::Face(face) => self.push_face(parsed.line, &face),
        }
    }

    /// Feed a whole record stream. Only a read failure stops the load.
    pub fn consume<I>(&mut self, records: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = Result<ParsedRecord, ParseError>>,
    {
        for item in records {
            match item {
                Ok(parsed) => self.push_record(parsed),
                Err(ParseError::Malformed {
                    line,
                    keyword,
                    reason,
                }) => self.warn(LoadWarning::MalformedRecord {
                    line,
                    keyword,
                    reason,
                }),
                Err(ParseError::UnknownLineType { line, token }) => {
                    self.warn(LoadWarning::UnknownLineType { line, token })
                }
                Err(e @ ParseError::Io(_)) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn finish(self) -> LoadedModel {
        debug!(
            "Assembled {} triangles from {} vertices, {} normals, {} texcoords",
            self.mesh.len(),
            self.positions.len(),
            self.normals.len(),
            self.texcoords.len()
        );
        LoadedModel {
            mesh: self.mesh,
            warnings: self.warnings,
        }
    }

    fn push_face(&mut self, line: usize, face: &Face) {
        if face.corners.len() < 3 {
            return self.warn(LoadWarning::MalformedRecord {
                line,
                keyword: "f",
                reason: format!("a face needs at least 3 corners, found {}", face.corners.len()),
            });
        }

        let corners = match self.resolve_face(line, face) {
            Ok(corners) => corners,
            Err(warning) => return self.warn(warning),
        };

        // fan around the first corner: (0, i, i + 1)
        for i in 1..corners.len() - 1 {
            self.mesh
                .add_triangle(Triangle::new(corners[0], corners[i], corners[i + 1]));
        }
    }

    /// Resolve every corner or reject the whole face
    fn resolve_face(&self, line: usize, face: &Face) -> Result<Vec<Vertex>, LoadWarning> {
        let positions = face
            .corners
            .iter()
            .map(|corner| lookup(&self.positions, Attribute::Position, corner.vertex, line))
            .collect::<Result<Vec<_>, _>>()?;

        // corners without a normal index take the polygon's own normal
        let fallback_normal = face_normal(&positions[0], &positions[1], &positions[2]);

        face.corners
            .iter()
            .zip(positions)
            .map(|(corner, position)| -> Result<Vertex, LoadWarning> {
                let (texcoord, normal) = self.resolve_attributes(corner, line)?;
                Ok(Vertex::new(
                    position,
                    normal.unwrap_or(fallback_normal),
                    texcoord.unwrap_or_else(Vec2::zeros),
                ))
            })
            .collect()
    }

    fn resolve_attributes(
        &self,
        corner: &Corner,
        line: usize,
    ) -> Result<(Option<Vec2>, Option<Vec3>), LoadWarning> {
        let texcoord = corner
            .texcoord
            .map(|index| lookup(&self.texcoords, Attribute::TexCoord, index, line))
            .transpose()?;
        let normal = corner
            .normal
            .map(|index| lookup(&self.normals, Attribute::Normal, index, line))
            .transpose()?;
        Ok((texcoord, normal))
    }

    fn warn(&mut self, warning: LoadWarning) {
        match warning {
            LoadWarning::UnknownLineType { .. } => debug!("Skipping: {}", warning),
            _ => warn!("Skipping: {}", warning),
        }
        self.warnings.push(warning);
    }
}

fn lookup<T: Copy>(
    pool: &Pool<T>,
    attribute: Attribute,
    index: i64,
    line: usize,
) -> Result<T, LoadWarning> {
    pool.get(index)
        .copied()
        .ok_or(LoadWarning::DanglingIndex {
            line,
            attribute,
            index,
            available: pool.len(),
        })
}
