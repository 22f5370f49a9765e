//! 3D transformation matrices
use nalgebra::{Matrix4, Vector3};

use crate::geometry::Bounds;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// Centre a model on the origin and scale it to fit a sphere of `radius`
    pub fn fit_matrix(bounds: &Bounds, radius: f32) -> Matrix4<f32> {
        let center = bounds.center();
        let extent = bounds.radius();
        let scale = if extent > f32::EPSILON {
            radius / extent
        } else {
            1.0
        };

        Self::scale_matrix(scale) * Self::translation_matrix(-center.x, -center.y, -center.z)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_mvp_order() {
        let model = Transform::translation_matrix(1.0, 0.0, 0.0);
        let view = Transform::scale_matrix(2.0);
        let mvp = Transform::mvp_matrix(&model, &view, &Matrix4::identity());

        let moved = mvp.transform_point(&Point3::origin());
        assert!((moved - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_fit_matrix_centres_and_scales() {
        let bounds = Bounds {
            min: Point3::new(10.0, 0.0, 0.0),
            max: Point3::new(14.0, 4.0, 4.0),
        };
        let fit = Transform::fit_matrix(&bounds, 1.0);

        let center = fit.transform_point(&Point3::new(12.0, 2.0, 2.0));
        assert!(center.coords.norm() < 1e-5);

        let corner = fit.transform_point(&bounds.max);
        assert!((corner.coords.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_matrix_single_point() {
        let point = Point3::new(1.0, 2.0, 3.0);
        let fit = Transform::fit_matrix(&Bounds { min: point, max: point }, 1.0);
        assert!(fit.transform_point(&point).coords.norm() < 1e-6);
    }
}
