//! Translates pointer drag/resize gestures, reported in viewport pixel
//! space, into normalized element patches. The resulting patch is routed
//! through [`crate::session::EditorSession::apply_local_edit`] so the edit
//! also reaches the persisted copy.

use super::element::ElementPatch;
use crate::geometry::{PixelPoint, PixelRect, ViewportSize};

/// Smallest normalized extent a resize may produce. A resize handle dragged
/// through the opposite edge reports a degenerate rectangle; collapsing to
/// zero would make the element permanently ungrabbable.
const MIN_NORMALIZED_EXTENT: f64 = 1.0e-6;

/// Translate a drag-stop at the given absolute pixel position. Updates the
/// anchor only; extents are preserved. Returns `None` when the viewport has
/// no layout yet, since converting through a zero-sized viewport would
/// produce non-finite geometry.
pub fn drag_stop(viewport: ViewportSize, position: PixelPoint) -> Option<ElementPatch> {
    if viewport.is_empty() {
        return None;
    }
    Some(ElementPatch::position(viewport.to_normalized(position)))
}

/// Translate a resize-stop reporting the element's new pixel bounding box.
/// A resize handle may move the anchor corner as well, so anchor and extents
/// land in one atomic patch. Extents are forced strictly positive no matter
/// how degenerate the reported rectangle is.
pub fn resize_stop(viewport: ViewportSize, bounds: PixelRect) -> Option<ElementPatch> {
    if viewport.is_empty() {
        return None;
    }
    let position = viewport.to_normalized(bounds.origin());
    let mut size = viewport.size_to_normalized(bounds.size());
    size.w = size.w.max(MIN_NORMALIZED_EXTENT);
    size.h = size.h.max(MIN_NORMALIZED_EXTENT);
    Some(ElementPatch::bounds(position, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{NormPoint, NormSize};

    const VIEWPORT: ViewportSize = ViewportSize::new(1000.0, 500.0);

    #[test]
    fn drag_stop_updates_position_only() {
        let patch = drag_stop(VIEWPORT, PixelPoint::new(250.0, 125.0))
            .expect("laid-out viewport should translate");
        assert_eq!(patch.position, Some(NormPoint::new(0.25, 0.25)));
        assert_eq!(patch.size, None);
        assert_eq!(patch.content, None);
        assert_eq!(patch.opacity, None);
    }

    #[test]
    fn drag_past_the_edge_stays_finite() {
        let patch = drag_stop(VIEWPORT, PixelPoint::new(-80.0, 620.0))
            .expect("laid-out viewport should translate");
        let position = patch.position.expect("drag patches carry a position");
        assert!(position.is_finite());
        assert_eq!(position, NormPoint::new(-0.08, 1.24));
    }

    #[test]
    fn resize_stop_updates_anchor_and_extents_in_one_patch() {
        let patch = resize_stop(VIEWPORT, PixelRect::new(100.0, 50.0, 200.0, 100.0))
            .expect("laid-out viewport should translate");
        assert_eq!(patch.position, Some(NormPoint::new(0.1, 0.1)));
        assert_eq!(patch.size, Some(NormSize::new(0.2, 0.2)));
    }

    #[test]
    fn degenerate_resize_keeps_extents_strictly_positive() {
        for bounds in [
            PixelRect::new(10.0, 10.0, 0.0, 0.0),
            PixelRect::new(10.0, 10.0, -30.0, 12.0),
            PixelRect::new(10.0, 10.0, 12.0, f64::NAN),
        ] {
            let patch = resize_stop(VIEWPORT, bounds).expect("viewport is laid out");
            let size = patch.size.expect("resize patches carry a size");
            assert!(size.w > 0.0, "{bounds:?} produced non-positive width");
            assert!(size.h > 0.0, "{bounds:?} produced non-positive height");
        }
    }

    #[test]
    fn gestures_against_an_unlaid_out_viewport_are_no_ops() {
        let empty = ViewportSize::new(0.0, 0.0);
        assert_eq!(drag_stop(empty, PixelPoint::new(10.0, 10.0)), None);
        assert_eq!(
            resize_stop(empty, PixelRect::new(0.0, 0.0, 10.0, 10.0)),
            None
        );
    }
}
