//! Camera parameters and projection matrices
//!
//! Projections follow glam's right-handed conventions with a [0, 1] depth range.

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Which volume the camera projects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Symmetric box; `half_height` is the half extent along Y.
    Orthographic { half_height: f32 },
    /// Perspective frustum; `fovy` is the vertical field of view in radians.
    Perspective { fovy: f32 },
}

/// Camera component data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub projection: Projection,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    /// May be `f32::INFINITY` for perspective cameras
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective {
                fovy: 60f32.to_radians(),
            },
            aspect: 1.0,
            near: 0.1,
            far: f32::INFINITY,
        }
    }
}

impl Camera {
    /// Create a perspective camera
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Perspective { fovy },
            aspect,
            near,
            far,
        }
    }

    /// Create an orthographic camera
    pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Orthographic { half_height },
            aspect,
            near,
            far,
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    /// Update the aspect ratio from a viewport size. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Compute the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Orthographic { half_height } => {
                let half_width = half_height * self.aspect;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
            Projection::Perspective { fovy } => {
                if self.far.is_infinite() {
                    Mat4::perspective_infinite_rh(fovy, self.aspect, self.near)
                } else {
                    Mat4::perspective_rh(fovy, self.aspect, self.near, self.far)
                }
            }
        }
    }
}
