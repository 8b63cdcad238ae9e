/// Orientation of the native point-cloud views
use nalgebra::{Matrix4, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Tilted so the grid's Z axis points up, viewed from a front corner
    pub fn isometric() -> Self {
        Self::new(-1.1, 0.0, -0.75)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::isometric()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Spin about the grid's own Z first, then tilt
        rx * ry * rz
    }

    /// Maps grid cell coordinates into a unit-radius box centred at the origin
    pub fn grid_to_unit(shape: [usize; 3]) -> Matrix4<f32> {
        let extent = shape.iter().copied().max().unwrap_or(1).max(1) as f32;
        let centre = Vector3::new(
            (shape[0] as f32 - 1.0) / 2.0,
            (shape[1] as f32 - 1.0) / 2.0,
            (shape[2] as f32 - 1.0) / 2.0,
        );
        Matrix4::new_scaling(2.0 / extent) * Matrix4::new_translation(&-centre)
    }

    /// Model matrix for a grid seen with `rotation`
    pub fn model_matrix(shape: [usize; 3], rotation: &RotationState) -> Matrix4<f32> {
        Self::rotation_matrix(rotation) * Self::grid_to_unit(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_grid_to_unit_centres_grid() {
        let m = Transform::grid_to_unit([5, 3, 1]);
        let centre = m.transform_point(&Point3::new(2.0, 1.0, 0.0));
        assert!(centre.coords.norm() < 1e-6);
        let corner = m.transform_point(&Point3::new(4.0, 1.0, 0.0));
        assert!((corner.x - 0.8).abs() < 1e-6);
    }
}
