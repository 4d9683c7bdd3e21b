//! Areas: rectangles bound to one item through four tab handles.

use alm_core::geometry::{Axis, Size};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::tab::TabId;

/// Stable identifier for an area.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(u64);

impl AreaId {
    /// Lowest valid area ID.
    pub const MIN: Self = Self(1);

    /// Create an area ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, LayoutError> {
        if raw == 0 {
            return Err(LayoutError::ZeroId { kind: "area" });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, LayoutError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(LayoutError::IdOverflow {
                kind: "area",
                current: self.0,
            });
        };
        Self::new(next)
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// Opaque handle of the widget or layout item an area holds.
///
/// Items live in the host toolkit; the engine only passes the handle around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

/// One edge of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaSide {
    Left,
    Top,
    Right,
    Bottom,
}

impl AreaSide {
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Axis of the tab bound on this side.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Top | Self::Bottom => Axis::Y,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
        }
    }

    /// Left and top are the near (lower coordinate) sides.
    #[inline]
    pub const fn is_near(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    /// Near side of `axis`.
    #[inline]
    pub const fn near(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Left,
            Axis::Y => Self::Top,
        }
    }

    /// Far side of `axis`.
    #[inline]
    pub const fn far(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Right,
            Axis::Y => Self::Bottom,
        }
    }

    #[inline]
    pub const fn mask(self) -> SideMask {
        match self {
            Self::Left => SideMask::LEFT,
            Self::Top => SideMask::TOP,
            Self::Right => SideMask::RIGHT,
            Self::Bottom => SideMask::BOTTOM,
        }
    }
}

bitflags! {
    /// Set of area sides, e.g. the borders an area is anchored to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SideMask: u8 {
        const LEFT = 0b0001;
        const TOP = 0b0010;
        const RIGHT = 0b0100;
        const BOTTOM = 0b1000;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

/// Value snapshot of an area's four tab handles.
///
/// Decoupled from any [`Area`], so the rectangle an area leaves behind can be
/// described after the area itself changed or was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaRef {
    pub left: TabId,
    pub top: TabId,
    pub right: TabId,
    pub bottom: TabId,
}

impl AreaRef {
    pub const fn new(left: TabId, top: TabId, right: TabId, bottom: TabId) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Snapshot the bindings of `area`.
    pub const fn of(area: &Area) -> Self {
        Self::new(area.left, area.top, area.right, area.bottom)
    }

    #[inline]
    pub const fn tab(&self, side: AreaSide) -> TabId {
        match side {
            AreaSide::Left => self.left,
            AreaSide::Top => self.top,
            AreaSide::Right => self.right,
            AreaSide::Bottom => self.bottom,
        }
    }

    /// Copy with the tab on `side` replaced.
    #[must_use]
    pub const fn with_tab(mut self, side: AreaSide, tab: TabId) -> Self {
        match side {
            AreaSide::Left => self.left = tab,
            AreaSide::Top => self.top = tab,
            AreaSide::Right => self.right = tab,
            AreaSide::Bottom => self.bottom = tab,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
    UseFullWidth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
    UseFullHeight,
}

/// Alignment of an item inside its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl Alignment {
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// A rectangle bound to one item by four tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub item: ItemId,
    pub left: TabId,
    pub top: TabId,
    pub right: TabId,
    pub bottom: TabId,
    /// Hard lower bound on the area size.
    pub min_size: Size,
    /// Hard upper bound on the area size, per axis.
    pub max_size: Option<Size>,
    /// Size the solver tries to reach when nothing stronger decides.
    pub preferred_size: Option<Size>,
    pub alignment: Alignment,
}

impl Area {
    /// Tab bound on `side`.
    #[inline]
    pub const fn tab(&self, side: AreaSide) -> TabId {
        match side {
            AreaSide::Left => self.left,
            AreaSide::Top => self.top,
            AreaSide::Right => self.right,
            AreaSide::Bottom => self.bottom,
        }
    }

    /// Rebind `side` to `tab`. Callers keep any derived adjacency in sync.
    #[inline]
    pub fn set_tab(&mut self, side: AreaSide, tab: TabId) {
        match side {
            AreaSide::Left => self.left = tab,
            AreaSide::Top => self.top = tab,
            AreaSide::Right => self.right = tab,
            AreaSide::Bottom => self.bottom = tab,
        }
    }

    /// Rebind all four sides.
    pub fn rebind(&mut self, to: AreaRef) {
        self.left = to.left;
        self.top = to.top;
        self.right = to.right;
        self.bottom = to.bottom;
    }

    /// Whether the area touches `tab` on any side.
    #[inline]
    pub fn uses_tab(&self, tab: TabId) -> bool {
        self.left == tab || self.top == tab || self.right == tab || self.bottom == tab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(raw: u64) -> TabId {
        TabId::new(raw).expect("test tab id must be non-zero")
    }

    #[test]
    fn zero_area_id_is_rejected() {
        assert!(AreaId::new(0).is_err());
        assert_eq!(AreaId::MIN.checked_next().map(AreaId::get), Ok(2));
    }

    #[test]
    fn side_geometry() {
        assert_eq!(AreaSide::Left.opposite(), AreaSide::Right);
        assert_eq!(AreaSide::Bottom.axis(), Axis::Y);
        assert!(AreaSide::Top.is_near());
        assert!(!AreaSide::Right.is_near());
        assert_eq!(AreaSide::far(Axis::X), AreaSide::Right);
        assert_eq!(
            AreaSide::Left.mask() | AreaSide::Right.mask(),
            SideMask::HORIZONTAL
        );
    }

    #[test]
    fn rebind_and_ref_round_trip() {
        let mut area = Area {
            id: AreaId::MIN,
            item: ItemId(1),
            left: tab(1),
            top: tab(2),
            right: tab(3),
            bottom: tab(4),
            min_size: Size::ZERO,
            max_size: None,
            preferred_size: None,
            alignment: Alignment::default(),
        };
        let before = AreaRef::of(&area);
        area.set_tab(AreaSide::Right, tab(9));
        assert_eq!(area.tab(AreaSide::Right), tab(9));
        assert!(area.uses_tab(tab(9)));
        assert!(!area.uses_tab(tab(3)));
        area.rebind(before);
        assert_eq!(AreaRef::of(&area), before);
        assert_eq!(before.tab(AreaSide::Top), tab(2));
    }
}
