/// Camera and projection for the native point-cloud views
use nalgebra::{Matrix4, Point3, Vector3};

/// A point projected into a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Normalized depth, smaller is closer
    pub depth: f32,
}

/// Camera looking at the origin, where the views centre their content
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Back the camera off until a sphere of `radius` around the target fits the view
    pub fn fit_radius(&mut self, radius: f32) {
        let half_fov = self.fov / 2.0;
        let narrow = if self.aspect < 1.0 {
            (half_fov.tan() * self.aspect).atan()
        } else {
            half_fov
        };
        let distance = radius / narrow.sin();
        let dir = (self.position - self.target).normalize();
        self.position = self.target + dir * distance;
        self.far = distance + radius * 2.0;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a 3D point to viewport pixels, `None` when outside the view volume
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        // Behind the eye, or too close to divide by
        if clip.w < 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;

        if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) || !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
