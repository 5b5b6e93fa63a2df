// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action slots revealed behind a row's content surface.
//!
//! A container is built from scratch every time a row starts revealing its
//! actions and dropped when the row finishes closing. Item views are requested
//! from the delegate on every build and never cached, so a delegate can change
//! how an action looks between reveals.
//!
//! ## Layout
//!
//! The container covers the row's content bounds and clips to them. Items are
//! consumed in index order and placed right to left: item `0` sits against the
//! trailing edge, item `1` to its left, and so on.
//!
//! ```text
//!  container
//! +--------------------------------------------+
//! |                      | item 2 | 1 | item 0 |
//! +--------------------------------------------+
//!                        ^ width - total_width
//! ```

use core::ops::Range;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::config::RowConfiguration;
use crate::delegate::{ItemView, SwipeRowDelegate};
use crate::error::ConfigurationError;
use crate::row::RowId;

/// One revealed action.
#[derive(Clone, Debug)]
pub struct ActionSlot<V> {
    index: usize,
    frame: Rect,
    reveal_start: f64,
    content: V,
    tappable_controls: usize,
}

impl<V> ActionSlot<V> {
    /// Item index this slot was built for.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Frame within the container. The item view fills it.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Horizontal extent measured from the leading edge of the revealed region.
    ///
    /// The revealed region is the trailing `total_width` of the container, so
    /// this range is independent of the row's width.
    #[must_use]
    pub fn reveal_range(&self) -> Range<f64> {
        let start = self.frame.x0 - self.reveal_start;
        start..start + self.frame.width()
    }

    /// The delegate-provided view.
    #[must_use]
    pub fn content(&self) -> &V {
        &self.content
    }

    /// Mutable access to the delegate-provided view.
    pub fn content_mut(&mut self) -> &mut V {
        &mut self.content
    }

    /// Number of tappable controls nested in the view.
    #[must_use]
    pub fn tappable_controls(&self) -> usize {
        self.tappable_controls
    }

    /// Returns `true` if tapping the slot reports
    /// [`SwipeRowDelegate::item_tapped`]. Slots with nested controls leave
    /// interaction to those controls.
    #[must_use]
    pub fn forwards_tap(&self) -> bool {
        self.tappable_controls == 0
    }
}

/// All action slots of a row, in item order.
#[derive(Clone, Debug)]
pub struct ActionContainer<V> {
    frame: Rect,
    slots: SmallVec<[ActionSlot<V>; 4]>,
}

impl<V: ItemView> ActionContainer<V> {
    /// Builds a container for `config` covering `bounds`.
    ///
    /// Returns `Ok(None)` when the configuration has no items. Fails if the
    /// delegate has no view for one of the items; views already produced for
    /// earlier items are dropped.
    pub fn build<D>(
        config: &RowConfiguration,
        bounds: Size,
        delegate: &mut D,
        row: RowId,
    ) -> Result<Option<Self>, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        if !config.has_items() {
            return Ok(None);
        }

        let frame = Rect::from_origin_size(Point::ZERO, bounds);
        let reveal_start = frame.width() - config.total_width();
        let mut slots = SmallVec::with_capacity(config.item_count());
        let mut sum_of_width = 0.0;
        for (index, &width) in config.item_widths().iter().enumerate() {
            sum_of_width += width;
            let content = delegate
                .item_view(row, index)
                .ok_or(ConfigurationError::MissingItemView { index })?;
            let x = frame.width() - sum_of_width;
            slots.push(ActionSlot {
                index,
                frame: Rect::new(x, 0.0, x + width, frame.height()),
                reveal_start,
                tappable_controls: content.tappable_controls(),
                content,
            });
        }
        Ok(Some(Self { frame, slots }))
    }
}

impl<V> ActionContainer<V> {
    /// Frame of the container, in content-surface coordinates.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The container always clips its slots to [`frame`](Self::frame).
    #[must_use]
    pub fn clips_to_bounds(&self) -> bool {
        true
    }

    /// Slots in item order.
    #[must_use]
    pub fn slots(&self) -> &[ActionSlot<V>] {
        &self.slots
    }

    /// Slot for item `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&ActionSlot<V>> {
        self.slots.get(index)
    }

    /// Mutable slot for item `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut ActionSlot<V>> {
        self.slots.get_mut(index)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots. Built containers always have at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot under `point`, in container coordinates.
    #[must_use]
    pub fn slot_at(&self, point: Point) -> Option<&ActionSlot<V>> {
        if !self.frame.contains(point) {
            return None;
        }
        self.slots.iter().find(|slot| slot.frame.contains(point))
    }
}
