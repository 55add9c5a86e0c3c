//! Scroll anchoring: keeps the visible content still when layout changes above or before it.
//!
//! Call [`ScrollViewer::begin_arrange`] before the content is arranged and
//! [`ScrollViewer::end_arrange`] right after. The viewer measures where the anchor sits relative
//! to the viewport on both sides of the arrange pass and scrolls by the drift.

use alloc::vec::Vec;

use crate::provider::ElementLayout;
use crate::{Axis, ChangeViewOptions, ElementId, Error, Point, Rect, Result, ScrollViewer, View};

/// Handed to `on_anchor_requested` before ranking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorRequest {
    /// Candidates ranked for this selection. Replacing them only affects this selection.
    pub candidates: Vec<ElementId>,
    /// Set to pick the anchor directly; ranking is skipped.
    pub anchor: Option<ElementId>,
}

/// How an axis is anchored during an arrange pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorMode {
    #[default]
    None,
    /// The view sits at the far edge and follows it.
    FarEdge,
    /// The view follows the selected anchor element.
    Element,
}

/// The selected anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub element: ElementId,
    /// Bounds relative to the content origin, unzoomed.
    pub bounds: Rect,
    /// The weighted point inside `bounds` tracked across the arrange pass.
    pub point: Point,
}

/// Anchoring mode of one axis.
///
/// A NaN ratio or an infinite viewport turns anchoring off. Ratio `0` at the near edge needs no
/// anchor. Ratio `1` within `edge_tolerance` of the far edge follows the far edge.
pub fn anchor_mode(
    ratio: f64,
    viewport: f64,
    offset: f64,
    min_offset: f64,
    scrollable: f64,
    edge_tolerance: f64,
) -> AnchorMode {
    if ratio.is_nan() || !viewport.is_finite() {
        return AnchorMode::None;
    }
    if ratio == 1.0 && scrollable - offset <= edge_tolerance {
        return AnchorMode::FarEdge;
    }
    if ratio == 0.0 && offset - min_offset <= edge_tolerance {
        return AnchorMode::None;
    }
    AnchorMode::Element
}

/// The point `ratio` of the way into `bounds` on each enabled axis; `0` weight elsewhere.
pub fn anchor_point(bounds: &Rect, ratios: [Option<f64>; 2]) -> Point {
    let mut point = bounds.origin();
    for (axis, ratio) in Axis::BOTH.into_iter().zip(ratios) {
        if let Some(ratio) = ratio {
            point.set(axis, bounds.start(axis) + ratio * bounds.length(axis));
        }
    }
    point
}

/// Picks the candidate closest to the viewport anchor point among those intersecting
/// `viewport`.
///
/// Distance is the sum of squared distances from the viewport anchor point to the candidate's
/// near and far edges on every enabled axis.
pub fn select_anchor(
    candidates: &[(ElementId, Rect)],
    viewport: &Rect,
    ratios: [Option<f64>; 2],
) -> Option<(ElementId, Rect)> {
    let target = anchor_point(viewport, ratios);
    let distance = |bounds: &Rect| -> f64 {
        Axis::BOTH
            .into_iter()
            .zip(ratios)
            .filter(|(_, ratio)| ratio.is_some())
            .map(|(axis, _)| {
                let a = target.get(axis);
                let near = a - bounds.start(axis);
                let far = a - bounds.end(axis);
                near * near + far * far
            })
            .sum()
    };
    candidates
        .iter()
        .filter(|(_, bounds)| bounds.intersects(viewport))
        .min_by(|(_, a), (_, b)| distance(a).total_cmp(&distance(b)))
        .copied()
}

/// Unzoomed drift of the anchor on `axis` between the two measurements.
pub fn compute_correction(pre: Point, post: Point, axis: Axis) -> f64 {
    post.get(axis) - pre.get(axis)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ArrangeSnapshot {
    modes: [AnchorMode; 2],
    // extent - viewport before the arrange pass, provider units.
    scrollable: [f64; 2],
    ratios: [Option<f64>; 2],
}

#[derive(Clone, Debug, Default)]
pub(crate) struct AnchorState {
    candidates: Vec<ElementId>,
    anchor: Option<Anchor>,
    arrange: Option<ArrangeSnapshot>,
}

impl AnchorState {
    pub(crate) fn clear_anchor(&mut self) {
        self.anchor = None;
    }
}

impl ScrollViewer {
    /// Registers `element` as an anchor candidate.
    pub fn register_anchor_candidate(&mut self, element: ElementId) -> Result<()> {
        if self.anchoring.candidates.contains(&element) {
            return Err(Error::invalid_operation(
                "element is already an anchor candidate",
            ));
        }
        self.anchoring.candidates.push(element);
        Ok(())
    }

    /// Removes `element` from the candidates. Returns `false` when it was not registered.
    pub fn unregister_anchor_candidate(&mut self, element: ElementId) -> bool {
        let before = self.anchoring.candidates.len();
        self.anchoring.candidates.retain(|c| *c != element);
        if self.anchoring.anchor.is_some_and(|a| a.element == element) {
            self.anchoring.anchor = None;
        }
        self.anchoring.candidates.len() != before
    }

    pub fn anchor_candidates(&self) -> &[ElementId] {
        &self.anchoring.candidates
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchoring.anchor.as_ref()
    }

    pub fn anchor_element(&self) -> Option<ElementId> {
        self.anchoring.anchor.map(|a| a.element)
    }

    /// Anchoring mode of `axis` for the current view.
    pub fn anchor_mode(&self, axis: Axis) -> AnchorMode {
        let target = self.current_target();
        anchor_mode(
            self.options.anchor_ratio(axis),
            self.model.viewport(axis),
            target.offset(axis),
            self.model.min_offset(axis),
            self.model.scrollable(axis),
            self.options.tolerances.edge_detection,
        )
    }

    /// Visible viewport in unzoomed content coordinates, at the pending target when one is in
    /// flight and without the pinned headers.
    pub fn anchor_viewport(&self) -> Rect {
        let target = self.current_target();
        let zoom = target.zoom_factor;
        let scale = f64::from(zoom);
        let headers = self.pinned_headers.size();
        let pixel = View::new(
            self.to_pixel_offset(Axis::Horizontal, target.horizontal_offset, zoom),
            self.to_pixel_offset(Axis::Vertical, target.vertical_offset, zoom),
            zoom,
        );
        Rect::new(
            (pixel.horizontal_offset + headers.width) / scale,
            (pixel.vertical_offset + headers.height) / scale,
            (self.model.pixel_viewport(Axis::Horizontal) - headers.width).max(0.0) / scale,
            (self.model.pixel_viewport(Axis::Vertical) - headers.height).max(0.0) / scale,
        )
    }

    /// Selects the anchor before the content is arranged. `layout` reports pre-arrange bounds.
    pub fn begin_arrange(&mut self, layout: &dyn ElementLayout) -> Result<()> {
        let modes = Axis::BOTH.map(|axis| self.anchor_mode(axis));
        if modes.iter().all(|m| *m == AnchorMode::None) {
            self.anchoring.anchor = None;
            self.anchoring.arrange = None;
            return Ok(());
        }
        let mut ratios = [None, None];
        for (i, axis) in Axis::BOTH.into_iter().enumerate() {
            if modes[i] == AnchorMode::Element {
                ratios[i] = Some(self.options.anchor_ratio(axis));
            }
        }
        let scrollable = Axis::BOTH.map(|axis| self.model.scrollable(axis));

        self.anchoring.anchor = if ratios.iter().any(Option::is_some) {
            self.select_anchor_element(layout, ratios)
        } else {
            None
        };
        strace!(?modes, anchor = ?self.anchoring.anchor, "begin arrange");
        self.anchoring.arrange = Some(ArrangeSnapshot {
            modes,
            scrollable,
            ratios,
        });
        Ok(())
    }

    fn select_anchor_element(
        &self,
        layout: &dyn ElementLayout,
        ratios: [Option<f64>; 2],
    ) -> Option<Anchor> {
        let mut request = AnchorRequest {
            candidates: self.anchoring.candidates.clone(),
            anchor: None,
        };
        if let Some(on_anchor_requested) = &self.options.on_anchor_requested {
            on_anchor_requested(&mut request);
        }
        let (element, bounds) = match request.anchor {
            Some(element) => (element, layout.element_bounds(element)?),
            None => {
                let candidates: Vec<(ElementId, Rect)> = request
                    .candidates
                    .iter()
                    .filter_map(|&e| layout.element_bounds(e).map(|b| (e, b)))
                    .collect();
                select_anchor(&candidates, &self.anchor_viewport(), ratios)?
            }
        };
        Some(Anchor {
            element,
            bounds,
            point: anchor_point(&bounds, ratios),
        })
    }

    /// Pulls the post-arrange scroll state and scrolls by the anchor drift. `layout` reports
    /// post-arrange bounds.
    pub fn end_arrange(&mut self, layout: &dyn ElementLayout) -> Result<()> {
        self.invalidate_scroll_info()?;
        let Some(snapshot) = self.anchoring.arrange.take() else {
            return Ok(());
        };

        let base = self.current_target();
        let zoom = base.zoom_factor;
        let mut targets: [Option<f64>; 2] = [None, None];
        let mut post_anchor = None;
        for (i, axis) in Axis::BOTH.into_iter().enumerate() {
            match snapshot.modes[i] {
                AnchorMode::None => {}
                AnchorMode::FarEdge => {
                    let delta = self.model.scrollable(axis) - snapshot.scrollable[i];
                    if delta != 0.0 {
                        targets[i] = Some(base.offset(axis) + delta);
                    }
                }
                AnchorMode::Element => {
                    let Some(anchor) = self.anchoring.anchor else {
                        continue;
                    };
                    let Some(bounds) = layout.element_bounds(anchor.element) else {
                        continue;
                    };
                    let post = anchor_point(&bounds, snapshot.ratios);
                    post_anchor = Some(Anchor {
                        element: anchor.element,
                        bounds,
                        point: post,
                    });
                    let drift = compute_correction(anchor.point, post, axis);
                    if drift != 0.0 {
                        let pixel = self.to_pixel_offset(axis, base.offset(axis), zoom)
                            + drift * f64::from(zoom);
                        targets[i] = Some(self.to_provider_offset(axis, pixel, zoom));
                    }
                }
            }
        }
        if post_anchor.is_some() {
            self.anchoring.anchor = post_anchor;
        }
        if targets.iter().all(Option::is_none) {
            return Ok(());
        }
        strace!(?targets, "anchor correction");
        self.change_view(
            targets[0],
            targets[1],
            None,
            ChangeViewOptions::immediate(),
        )?;
        Ok(())
    }
}
