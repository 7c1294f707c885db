//! Box shape: half-extents plus the geometric queries the intersection
//! test needs (vertices, support point, inverse inertia tensor)

use crate::simulation::params::EPSILON;
use crate::simulation::states::{NMat3, NVec3};

/// Axis-aligned box in its own body frame, described by half-extents.
/// World placement comes from the owning body's pose.
#[derive(Debug, Clone)]
pub struct BoxShape {
    pub half: NVec3, // half-extent along each local axis
}

impl BoxShape {
    /// Box from half-extents
    pub fn new(hx: f64, hy: f64, hz: f64) -> Self {
        Self {
            half: NVec3::new(hx, hy, hz),
        }
    }

    /// Box from full edge lengths, as scene data specifies them
    pub fn from_size(size: NVec3) -> Self {
        Self { half: 0.5 * size }
    }

    /// Full edge lengths
    pub fn size(&self) -> NVec3 {
        2.0 * self.half
    }

    /// The 8 corners in the local frame: every sign combination of the
    /// half-extents
    pub fn vertices(&self) -> [NVec3; 8] {
        let mut out = [NVec3::zeros(); 8];
        for (i, v) in out.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { self.half.x } else { -self.half.x };
            let sy = if i & 2 == 0 { self.half.y } else { -self.half.y };
            let sz = if i & 4 == 0 { self.half.z } else { -self.half.z };
            *v = NVec3::new(sx, sy, sz);
        }
        out
    }

    /// Local support point in direction `dir`: the extreme feature of the
    /// box, component-wise. Components of `dir` within EPSILON of zero
    /// contribute nothing, so a face-aligned query returns the face center
    /// and an edge-aligned query the edge midpoint rather than an arbitrary
    /// corner of the tied set.
    pub fn support(&self, dir: &NVec3) -> NVec3 {
        let mut p = NVec3::zeros();
        for k in 0..3 {
            if dir[k] > EPSILON {
                p[k] = self.half[k];
            } else if dir[k] < -EPSILON {
                p[k] = -self.half[k];
            }
        }
        p
    }

    /// Inverse inertia tensor in the body frame for a uniform box.
    /// Returns the zero matrix for a fixed body (inv_mass = 0), which keeps
    /// omega identically zero without special-casing callers.
    pub fn inv_inertia(&self, inv_mass: f64) -> NMat3 {
        if inv_mass == 0.0 {
            return NMat3::zeros();
        }
        let hx2 = self.half.x * self.half.x;
        let hy2 = self.half.y * self.half.y;
        let hz2 = self.half.z * self.half.z;
        NMat3::from_diagonal(&NVec3::new(
            3.0 * inv_mass / (hy2 + hz2),
            3.0 * inv_mass / (hx2 + hz2),
            3.0 * inv_mass / (hx2 + hy2),
        ))
    }
}
