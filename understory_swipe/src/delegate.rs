// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between a swipe row and the code that describes its actions.

use crate::row::RowId;

/// A host view placed inside an action slot.
///
/// The row never draws or inspects the view beyond this trait; it only owns
/// it for as long as the action container lives.
pub trait ItemView {
    /// Number of tappable controls nested directly inside this view.
    ///
    /// When non-zero, taps on the slot itself are not reported to
    /// [`SwipeRowDelegate::item_tapped`]; the nested controls handle
    /// interaction and each of them closes the row when tapped.
    fn tappable_controls(&self) -> usize {
        0
    }
}

/// Supplies action metadata and receives row notifications.
///
/// The required methods describe the actions. The remaining methods are
/// optional notifications with empty default bodies; leaving them out is
/// never an error.
///
/// Rows do not store their delegate. Every operation that needs one borrows
/// it for the duration of the call, so a delegate can serve any number of
/// rows and is never kept alive by them.
pub trait SwipeRowDelegate {
    /// View type produced for each action slot.
    type View: ItemView;

    /// Number of trailing actions for `row`.
    fn item_count(&self, row: RowId) -> usize;

    /// Width of the action at `index`. Must be finite and greater than zero.
    fn item_width(&self, row: RowId, index: usize) -> f64;

    /// View for the action at `index`.
    ///
    /// Requested again every time the actions are revealed; views are
    /// dropped when the row finishes closing.
    fn item_view(&mut self, row: RowId, index: usize) -> Option<Self::View>;

    /// The action at `index` was tapped. The row closes right after.
    fn item_tapped(&mut self, _row: RowId, _index: usize) {}

    /// `row` finished opening.
    fn did_begin_editing(&mut self, _row: RowId) {}

    /// `row` finished closing.
    ///
    /// Always preceded by [`did_begin_editing`](Self::did_begin_editing) if the
    /// row started opening, even when the close cut that opening short. A row
    /// that was only dragged part way and released closed reports the end
    /// alone.
    fn did_end_editing(&mut self, _row: RowId) {}
}
