//! ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use spiderling_core::{Camera, DisplayMode, Mesh, Primitive, Transform, Vertex};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph used for point primitives
const POINT_CHAR: char = 'o';

/// Fixed directional light and its ambient/diffuse split
const LIGHT_DIRECTION: [f32; 3] = [0.5, 1.0, 1.5];
const AMBIENT: f32 = 0.2;
const DIFFUSE: f32 = 0.8;

type ScreenPoint = (f32, f32, f32);

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Number of cells that received a glyph
    pub fn covered(&self) -> usize {
        self.char_buffer.iter().filter(|c| **c != ' ').count()
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        mode: DisplayMode,
    ) {
        let mvp = Transform::mvp_matrix(
            model_matrix,
            &camera.view_matrix(),
            &camera.projection_matrix(),
        );
        let project = |vertex: &Vertex| {
            camera.project_with(&mvp, &vertex.position, self.width as u32, self.height as u32)
        };

        let mut fills = Vec::new();
        let mut lines = Vec::new();
        let mut points = Vec::new();

        for primitive in mesh.primitives(mode) {
            match primitive {
                Primitive::Triangle([a, b, c]) => {
                    // Triangle is clipped as a whole
                    if let (Some(pa), Some(pb), Some(pc)) = (project(a), project(b), project(c)) {
                        let character = shade([a, b, c], model_matrix);
                        fills.push(([pa, pb, pc], character));
                    }
                }
                Primitive::Line([a, b]) => {
                    if let (Some(pa), Some(pb)) = (project(a), project(b)) {
                        lines.push((pa, pb));
                    }
                }
                Primitive::Point(a) => {
                    if let Some(pa) = project(a) {
                        points.push(pa);
                    }
                }
            }
        }

        for (coords, character) in fills {
            self.rasterize_triangle(&coords, character);
        }
        for (from, to) in lines {
            self.rasterize_line(from, to);
        }
        for point in points {
            self.plot(point.0, point.1, point.2, POINT_CHAR);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(px, py, depth, character);
                    }
                }
            }
        }
    }

    /// Walk the segment one cell at a time, interpolating depth
    fn rasterize_line(&mut self, from: ScreenPoint, to: ScreenPoint) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let character = line_char(dx, dy);

        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.plot(
                from.0 + dx * t,
                from.1 + dy * t,
                from.2 + (to.2 - from.2) * t,
                character,
            );
        }
    }

    fn plot(&mut self, x: f32, y: f32, depth: f32, character: char) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    '|' | '/' | '\\' | '_' => Color::Green,
                    POINT_CHAR => Color::Yellow,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Lambert shading from the corners' normals, rotated into world space
fn shade(corners: [&Vertex; 3], model_matrix: &Matrix4<f32>) -> char {
    let summed: Vector3<f32> = corners.iter().map(|v| v.normal).sum();
    let normal = model_matrix
        .transform_vector(&summed)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros);

    let light = Vector3::from(LIGHT_DIRECTION).normalize();
    let brightness = AMBIENT + DIFFUSE * normal.dot(&light).max(0.0);

    let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[char_index.clamp(1, LUMINOSITY_RAMP.len() - 1)]
}

/// Pick a glyph that follows the direction of a segment on screen
fn line_char(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(mode: DisplayMode) -> AsciiRenderer {
        let mut camera = Camera::new(80, 80);
        camera.orbit(0.3, 4.0);
        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.render_mesh(&Mesh::cube(2.0), &Matrix4::identity(), &camera, mode);
        renderer
    }

    #[test]
    fn test_modes_produce_different_coverage() {
        let solid = render(DisplayMode::Solid).covered();
        let wire = render(DisplayMode::Wireframe).covered();
        let points = render(DisplayMode::Points).covered();

        assert!(solid > wire);
        assert!(wire > points);
        assert!(points > 0);
    }

    #[test]
    fn test_points_mode_only_plots_points() {
        let renderer = render(DisplayMode::Points);
        assert!(renderer
            .char_buffer
            .iter()
            .all(|c| *c == ' ' || *c == POINT_CHAR));
    }

    #[test]
    fn test_empty_mesh_draws_nothing() {
        let mut renderer = AsciiRenderer::new(20, 10);
        renderer.render_mesh(
            &Mesh::new(),
            &Matrix4::identity(),
            &Camera::new(20, 20),
            DisplayMode::Solid,
        );
        assert_eq!(renderer.covered(), 0);
    }

    #[test]
    fn test_line_glyphs() {
        assert_eq!(line_char(10.0, 1.0), '-');
        assert_eq!(line_char(0.5, -8.0), '|');
        assert_eq!(line_char(3.0, 3.0), '\\');
        assert_eq!(line_char(-3.0, 3.0), '/');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(4, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
