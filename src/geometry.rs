/*
 * DPI-aware geometry used by pseudo-maximization and drag-to-restore.
 *
 * A window maximized by resizing it to the work area would leave a visible gap
 * where the invisible native frame and shadow sit. The window is therefore
 * placed over the work area expanded by a symmetric border compensation, and the
 * content root is inset by the same amount so the visible content lands exactly
 * on the work area.
 */

use crate::types::{DpiScale, DragThreshold, FrameMetrics, MonitorMetrics, Rect, ScreenPoint};

/// DIPs between the pointer and the top edge of a window restored by dragging.
pub const DRAG_RESTORE_TITLE_OFFSET: f64 = 15.0;

/// Outer bounds and content inset of a pseudo-maximized window, both in DIPs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaximizedLayout {
    pub bounds: Rect,
    pub content_inset: f64,
}

/// `(frame border + padded border) / scale.x`: one value for all four edges.
pub fn border_compensation(frame: FrameMetrics, scale: DpiScale) -> f64 {
    (frame.frame_border_px + frame.padded_border_px) as f64 / scale.x
}

/// Converts a device-pixel rectangle to DIPs using per-axis scale factors.
pub fn rect_to_dips(rect_px: Rect, scale: DpiScale) -> Rect {
    Rect {
        left: rect_px.left / scale.x,
        top: rect_px.top / scale.y,
        width: rect_px.width / scale.x,
        height: rect_px.height / scale.y,
    }
}

pub fn point_to_dips(point_px: ScreenPoint, scale: DpiScale) -> ScreenPoint {
    ScreenPoint {
        x: point_px.x / scale.x,
        y: point_px.y / scale.y,
    }
}

pub fn pseudo_maximized_layout(monitor: MonitorMetrics, frame: FrameMetrics) -> MaximizedLayout {
    let compensation = border_compensation(frame, monitor.scale);
    MaximizedLayout {
        bounds: rect_to_dips(monitor.work_area, monitor.scale).expanded(compensation),
        content_inset: compensation,
    }
}

/*
 * Places a window of `restore_size` so that its horizontal centre sits under the
 * pointer and its top edge sits `DRAG_RESTORE_TITLE_OFFSET` above it. The pointer
 * is converted with the scale of the monitor it is currently on, which may differ
 * from the one the window was maximized on.
 */
pub fn drag_restore_bounds(
    pointer_px: ScreenPoint,
    scale: DpiScale,
    width: f64,
    height: f64,
) -> Rect {
    let pointer = point_to_dips(pointer_px, scale);
    Rect {
        left: pointer.x - width / 2.0,
        top: pointer.y - DRAG_RESTORE_TITLE_OFFSET,
        width,
        height,
    }
}

/// True once either displacement component strictly exceeds the OS threshold.
pub fn exceeds_drag_threshold(
    start: ScreenPoint,
    current: ScreenPoint,
    threshold: DragThreshold,
) -> bool {
    (current.x - start.x).abs() > threshold.horizontal
        || (current.y - start.y).abs() > threshold.vertical
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameMetrics = FrameMetrics {
        frame_border_px: 4,
        padded_border_px: 4,
    };

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn border_compensation_divides_by_horizontal_scale() {
        assert_eq!(border_compensation(FRAME, DpiScale::IDENTITY), 8.0);
        assert_eq!(border_compensation(FRAME, DpiScale { x: 2.0, y: 1.0 }), 4.0);
    }

    #[test]
    fn maximized_layout_expands_work_area_at_unit_scale() {
        let monitor = MonitorMetrics {
            work_area: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            scale: DpiScale::IDENTITY,
        };
        let layout = pseudo_maximized_layout(monitor, FRAME);
        assert_eq!(layout.bounds, Rect::new(-8.0, -8.0, 1936.0, 1096.0));
        assert_eq!(layout.content_inset, 8.0);
    }

    #[test]
    fn visible_content_equals_work_area_for_fractional_scales() {
        for (scale, work_area) in [
            (DpiScale::uniform(1.25), Rect::new(0.0, 0.0, 2560.0, 1400.0)),
            (DpiScale::uniform(1.5), Rect::new(1920.0, 0.0, 3840.0, 2100.0)),
            (DpiScale { x: 1.75, y: 2.0 }, Rect::new(-1280.0, 40.0, 1280.0, 984.0)),
        ] {
            let layout = pseudo_maximized_layout(MonitorMetrics { work_area, scale }, FRAME);
            let visible = layout.bounds.inset(layout.content_inset);
            let expected = rect_to_dips(work_area, scale);
            assert!(approx_eq(visible.left, expected.left), "{scale:?}");
            assert!(approx_eq(visible.top, expected.top), "{scale:?}");
            assert!(approx_eq(visible.width, expected.width), "{scale:?}");
            assert!(approx_eq(visible.height, expected.height), "{scale:?}");
        }
    }

    #[test]
    fn drag_restore_centres_window_under_pointer() {
        let bounds = drag_restore_bounds(
            ScreenPoint::new(1500.0, 300.0),
            DpiScale::uniform(1.5),
            800.0,
            600.0,
        );
        assert_eq!(bounds, Rect::new(600.0, 200.0 - DRAG_RESTORE_TITLE_OFFSET, 800.0, 600.0));
    }

    #[test]
    fn threshold_is_strict_on_each_axis() {
        let start = ScreenPoint::new(100.0, 100.0);
        let threshold = DragThreshold::default();
        assert!(!exceeds_drag_threshold(start, ScreenPoint::new(104.0, 96.0), threshold));
        assert!(exceeds_drag_threshold(start, ScreenPoint::new(104.5, 100.0), threshold));
        assert!(exceeds_drag_threshold(start, ScreenPoint::new(100.0, 95.0), threshold));
    }
}
