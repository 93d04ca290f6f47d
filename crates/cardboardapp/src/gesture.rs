//! # Pointer Gestures
//!
//! Two gestures drive ordering and layout, both free of any UI toolkit:
//!
//! - [`ListDrag`]: dragging a flashcard within its list. A hovered item only
//!   trades places with the dragged one once the pointer crosses the hovered
//!   item's vertical midpoint in the direction of travel, so hovering near a
//!   boundary cannot make items flicker back and forth.
//! - [`PointerDrag`]: dragging a topic on the canvas. A release closer than
//!   [`CLICK_THRESHOLD_PX`] to the press point on both axes is a click; anything
//!   else is a move whose final position gets persisted.

/// Displacement under which a press/release pair counts as a click.
pub const CLICK_THRESHOLD_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vertical extent of a list item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    pub top: f64,
    pub height: f64,
}

impl ItemBounds {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Reordering a list by dragging one item over the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDrag {
    origin: usize,
    current: usize,
}

impl ListDrag {
    pub fn start(index: usize) -> Self {
        Self {
            origin: index,
            current: index,
        }
    }

    /// Where the dragged item currently sits.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Pointer at `pointer_y` over the item at `hovered`.
    ///
    /// Returns the `(from, to)` move to apply to the displayed list, or `None`
    /// while the pointer has not crossed the hovered item's midpoint.
    pub fn hover(&mut self, hovered: usize, pointer_y: f64, bounds: ItemBounds) -> Option<(usize, usize)> {
        let midpoint = bounds.midpoint();
        let crossed = if hovered > self.current {
            pointer_y > midpoint
        } else if hovered < self.current {
            pointer_y < midpoint
        } else {
            false
        };
        if !crossed {
            return None;
        }
        let from = self.current;
        self.current = hovered;
        Some((from, hovered))
    }

    /// The net move for the ordering engine, if the item ended up elsewhere.
    pub fn finish(self) -> Option<(usize, usize)> {
        (self.origin != self.current).then_some((self.origin, self.current))
    }
}

/// How a canvas drag ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragRelease {
    /// Selects or opens the item; nothing is written.
    Click,
    /// New position to persist.
    Moved { x: f64, y: f64 },
}

/// Dragging an item on the free-form canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDrag {
    start_pointer: Point,
    start_position: Point,
}

impl PointerDrag {
    /// Pointer pressed at `pointer` on an item placed at `position`.
    pub fn begin(pointer: Point, position: Point) -> Self {
        Self {
            start_pointer: pointer,
            start_position: position,
        }
    }

    /// Where the item is drawn while the pointer is at `pointer`.
    ///
    /// No snapping and no bounds: positions may go negative.
    pub fn position_at(&self, pointer: Point) -> Point {
        Point {
            x: self.start_position.x + (pointer.x - self.start_pointer.x),
            y: self.start_position.y + (pointer.y - self.start_pointer.y),
        }
    }

    pub fn release(&self, pointer: Point) -> DragRelease {
        let dx = pointer.x - self.start_pointer.x;
        let dy = pointer.y - self.start_pointer.y;
        if dx.abs() < CLICK_THRESHOLD_PX && dy.abs() < CLICK_THRESHOLD_PX {
            return DragRelease::Click;
        }
        let pos = self.position_at(pointer);
        DragRelease::Moved { x: pos.x, y: pos.y }
    }
}
