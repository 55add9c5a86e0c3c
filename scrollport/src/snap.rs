//! Snap point resolution.
//!
//! Snap points arrive from the content in unzoomed content coordinates, computed for the
//! requested alignment. They are resolved into zoomed pixel offsets of the viewport's near edge
//! so that they can be compared with scroll offsets directly.

use alloc::vec::Vec;

use crate::provider::SnapPoints;
use crate::{SnapPointsAlignment, SnapPointsType};

// Slack for "strictly ahead of the current offset" comparisons.
const DIRECTION_EPSILON: f64 = 1e-6;

/// Geometry snap points are resolved against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapGeometry {
    pub zoom_factor: f32,
    /// Zoomed pixel viewport.
    pub viewport: f64,
    /// Zoomed pixel extent.
    pub extent: f64,
    /// Boundary tolerance per unit of zoom for irregular points.
    pub location_tolerance: f64,
}

impl SnapGeometry {
    /// Largest offset reachable: `max(0, extent - viewport)`.
    pub fn max_offset(&self) -> f64 {
        (self.extent - self.viewport).max(0.0)
    }
}

/// Regular snap points in zoomed pixels: `offset + k * interval` for every integer `k`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegularSnapPoints {
    pub offset: f64,
    pub interval: f64,
}

impl RegularSnapPoints {
    fn index_at_or_before(&self, value: f64) -> f64 {
        ((value - self.offset) / self.interval + DIRECTION_EPSILON).floor()
    }

    fn at(&self, k: f64) -> f64 {
        self.offset + k * self.interval
    }

    fn nearest(&self, value: f64) -> f64 {
        self.at(((value - self.offset) / self.interval).round())
    }
}

/// Snap points of one axis, resolved for the current zoom factor and viewport.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapPointSet {
    pub optional: bool,
    /// Single snap points break inertia at the first point crossed.
    pub single: bool,
    pub alignment: SnapPointsAlignment,
    pub regular: Option<RegularSnapPoints>,
    pub irregular: Option<Vec<f64>>,
    /// Values are measured from the far end of the scrollable range: a value `m` stands for the
    /// offset `max_offset - m`.
    pub mirrored: bool,
}

/// Resolves raw snap points for `kind`/`alignment` against `geometry`.
///
/// Returns `None` when the type is [`SnapPointsType::None`] or the content exposes no usable
/// points.
pub fn resolve_snap_points(
    points: Option<&SnapPoints>,
    kind: SnapPointsType,
    alignment: SnapPointsAlignment,
    geometry: &SnapGeometry,
) -> Option<SnapPointSet> {
    if kind.is_none() {
        return None;
    }
    let zoom = f64::from(geometry.zoom_factor);
    let mut set = SnapPointSet {
        optional: kind.is_optional(),
        single: kind.is_single(),
        alignment,
        regular: None,
        irregular: None,
        mirrored: false,
    };
    match points? {
        SnapPoints::Regular { offset, interval } => {
            let interval = f64::from(*interval) * zoom;
            if !(interval.is_finite() && interval > 0.0) {
                return None;
            }
            let mut offset = f64::from(*offset) * zoom;
            match alignment {
                SnapPointsAlignment::Near => {}
                SnapPointsAlignment::Center => {
                    offset -= geometry.viewport / 2.0;
                    if offset < 0.0 {
                        offset = offset.rem_euclid(interval);
                    }
                }
                SnapPointsAlignment::Far => set.mirrored = true,
            }
            set.regular = Some(RegularSnapPoints { offset, interval });
        }
        SnapPoints::Irregular(values) => {
            let max = geometry.max_offset();
            let tolerance = geometry.location_tolerance * zoom;
            let shift = match alignment {
                SnapPointsAlignment::Near => 0.0,
                SnapPointsAlignment::Center => -geometry.viewport / 2.0,
                SnapPointsAlignment::Far => -geometry.viewport,
            };
            let mut resolved: Vec<f64> = values
                .iter()
                .filter(|v| v.is_finite())
                .map(|v| f64::from(*v) * zoom + shift)
                .filter_map(|v| {
                    if (0.0..=max).contains(&v) {
                        Some(v)
                    } else if v < 0.0 && v >= -tolerance {
                        Some(0.0)
                    } else if v > max && v <= max + tolerance {
                        Some(max)
                    } else {
                        None
                    }
                })
                .collect();
            resolved.sort_by(f64::total_cmp);
            resolved.dedup();
            if resolved.is_empty() {
                return None;
            }
            set.irregular = Some(resolved);
        }
    }
    Some(set)
}

/// How a requested offset is pulled onto the snap points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapAdjustment {
    /// The point nearest the requested offset.
    Mandatory,
    /// The first point in the direction of travel from the current offset.
    MandatorySingle,
}

impl SnapPointSet {
    /// Adjusts `requested` onto a snap point, clamped to `[min, max]`.
    ///
    /// `current` is the offset the view moves from; it only matters for
    /// [`SnapAdjustment::MandatorySingle`].
    pub fn adjust_offset(
        &self,
        requested: f64,
        current: f64,
        min: f64,
        max: f64,
        mode: SnapAdjustment,
    ) -> f64 {
        let (requested_m, current_m, lo, hi) = if self.mirrored {
            (max - requested, max - current, 0.0, max - min)
        } else {
            (requested, current, min, max)
        };

        let adjusted = match mode {
            SnapAdjustment::Mandatory => self.nearest(requested_m),
            SnapAdjustment::MandatorySingle => {
                self.single_step(requested_m, current_m, lo, hi)
            }
        };
        let Some(adjusted) = adjusted else {
            return requested;
        };
        let adjusted = adjusted.clamp(lo, hi.max(lo));
        if self.mirrored { max - adjusted } else { adjusted }
    }

    fn nearest(&self, value: f64) -> Option<f64> {
        if let Some(regular) = &self.regular {
            return Some(regular.nearest(value));
        }
        let points = self.irregular.as_deref()?;
        points
            .iter()
            .copied()
            .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
    }

    fn single_step(&self, requested: f64, current: f64, lo: f64, hi: f64) -> Option<f64> {
        let travel = requested - current;
        if travel.abs() <= DIRECTION_EPSILON {
            return self.nearest(current);
        }
        let forward = travel > 0.0;
        let in_bounds = |v: f64| v >= lo - DIRECTION_EPSILON && v <= hi + DIRECTION_EPSILON;

        if let Some(regular) = &self.regular {
            let base = regular.index_at_or_before(current);
            let at_current = (regular.at(base) - current).abs() <= DIRECTION_EPSILON;
            let (ahead, behind) = if forward {
                (regular.at(base + 1.0), regular.at(base))
            } else if at_current {
                (regular.at(base - 1.0), regular.at(base))
            } else {
                (regular.at(base), regular.at(base + 1.0))
            };
            return Some(if in_bounds(ahead) { ahead } else { behind });
        }

        let points = self.irregular.as_deref()?;
        let ahead = if forward {
            points
                .iter()
                .copied()
                .find(|&p| p > current + DIRECTION_EPSILON && in_bounds(p))
        } else {
            points
                .iter()
                .rev()
                .copied()
                .find(|&p| p < current - DIRECTION_EPSILON && in_bounds(p))
        };
        ahead.or_else(|| {
            let behind = if forward {
                points.iter().rev().copied().find(|&p| p <= current + DIRECTION_EPSILON)
            } else {
                points.iter().copied().find(|&p| p >= current - DIRECTION_EPSILON)
            };
            behind.or_else(|| self.nearest(current))
        })
    }
}

/// Nearest zoom snap point within `[min, max]`, or `requested` when there is none.
pub fn nearest_zoom_snap_point(points: &[f32], requested: f32, min: f32, max: f32) -> f32 {
    points
        .iter()
        .copied()
        .filter(|p| p.is_finite() && (min..=max).contains(p))
        .min_by(|a, b| (a - requested).abs().total_cmp(&(b - requested).abs()))
        .unwrap_or(requested)
}
