//! Point queries used by drag gestures: which area or tab lies under the
//! pointer. Pure geometry over the current tab values.

use alm_core::geometry::{Axis, Point};

use crate::area::{AreaId, AreaSide};
use crate::layout::Layout;
use crate::tab::TabId;

/// First area, in layout order, whose frame contains `point`.
#[must_use]
pub fn area_at(layout: &Layout, point: Point) -> Option<AreaId> {
    layout
        .areas()
        .iter()
        .find(|area| layout.frame(area.id).is_some_and(|frame| frame.contains(point)))
        .map(|area| area.id)
}

/// Tab of `axis` closest to `point` within `tolerance`.
///
/// Scans tabs in value order and stops at the first one past a match, so
/// the closest of a run of nearby tabs wins.
#[must_use]
pub fn tab_near_point(layout: &Layout, axis: Axis, point: Point, tolerance: f64) -> Option<TabId> {
    let position = axis.of_point(point);
    let mut selected = None;
    let mut proximity = tolerance;
    for tab in layout.tabs_sorted(axis) {
        let distance = (layout.value_or_zero(tab) - position).abs();
        if distance < proximity {
            selected = Some(tab);
            proximity = distance;
        } else if selected.is_some() {
            break;
        }
    }
    selected
}

/// Edge tab of `area` along `axis` within `tolerance` of `point`, near edge
/// first.
#[must_use]
pub fn area_tab_near_point(
    layout: &Layout,
    area: AreaId,
    axis: Axis,
    point: Point,
    tolerance: f64,
) -> Option<TabId> {
    let area = layout.area(area)?;
    let position = axis.of_point(point);
    [AreaSide::near(axis), AreaSide::far(axis)]
        .into_iter()
        .map(|side| area.tab(side))
        .find(|tab| (layout.value_or_zero(*tab) - position).abs() < tolerance)
}

/// Tab a dragged edge starting on `start` should land on for `point`.
///
/// Searches from `start` toward the point and keeps the closest tab, ending
/// the scan once tabs get further away again. `None` when the point is
/// still within `tolerance` of `start`.
#[must_use]
pub fn best_tab(layout: &Layout, start: TabId, point: Point, tolerance: f64) -> Option<TabId> {
    let axis = layout.tab_axis(start)?;
    let position = axis.of_point(point);
    let origin = layout.value_or_zero(start);
    if (origin - position).abs() < tolerance {
        return None;
    }

    let mut sorted = layout.tabs_sorted(axis);
    let forward = origin < position;
    if !forward {
        sorted.reverse();
    }
    let mut selected = None;
    let mut min = f64::INFINITY;
    for tab in sorted {
        if tab == start {
            continue;
        }
        let value = layout.value_or_zero(tab);
        let behind = if forward {
            value < origin
        } else {
            value > origin
        };
        if behind {
            continue;
        }
        let distance = (value - position).abs();
        if min < distance {
            break;
        }
        min = distance;
        selected = Some(tab);
    }
    selected
}
