//! Surface-aligned poses sampled from route curves.

use glam::{Mat3, Quat, Vec3};
use gt_core::PoseBounds;
use gt_spatial::RouteEdge;

/// Orthonormal basis for a vehicle travelling over the globe.
///
/// `forward` follows the route tangent, `up` points away from the globe
/// centre (re-orthogonalised against `forward`), and `right` is
/// `forward × up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub right:   Vec3,
    pub up:      Vec3,
    pub forward: Vec3,
}

impl Frame {
    /// Build a frame from a travel direction and an approximate up vector.
    ///
    /// Returns `None` when either vector is degenerate or they are parallel.
    pub fn look_along(tangent: Vec3, up_hint: Vec3) -> Option<Frame> {
        let forward = tangent.try_normalize()?;
        let right   = forward.cross(up_hint).try_normalize()?;
        let up      = right.cross(forward);
        Some(Frame { right, up, forward })
    }

    /// Rotation taking local `+Z` to `forward` and local `+Y` to `up`.
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&Mat3::from_cols(-self.right, self.up, self.forward)).normalize()
    }
}

/// Position and orientation of one rendered body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub frame:    Frame,
}

impl Pose {
    pub fn from_frame(position: Vec3, frame: Frame) -> Self {
        Self { position, rotation: frame.rotation(), frame }
    }

    /// `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Sample a surface pose on `edge` at `progress`.
///
/// Returns `None` for samples that are non-finite or outside `bounds`; the
/// caller hides the body for that tick.
pub fn sample_edge(edge: &RouteEdge, progress: f32, bounds: &PoseBounds) -> Option<Pose> {
    let t = progress.clamp(0.0, 1.0);
    let position = edge.point_at(t);
    if !position.is_finite() || !bounds.contains(position.length()) {
        log::trace!("pose sample at t={t} rejected ({position})");
        return None;
    }
    let frame = Frame::look_along(edge.tangent_at(t), position.normalize_or_zero())?;
    let pose = Pose::from_frame(position, frame);
    pose.is_finite().then_some(pose)
}
