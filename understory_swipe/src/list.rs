// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A list of swipe rows that keeps at most one of them open.
//!
//! [`SwipeList`] owns its rows and two [`Subscribers`] registries:
//!
//! - a drag channel: when a row begins a pan, every other row closes if open;
//! - scroll observers: when the list's scroll offset changes, every open row closes.
//!
//! Rows subscribe to both when inserted and unsubscribe when removed. All
//! delivery is synchronous inside the call that triggered it, so the returned
//! effects already include the reactions of other rows.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Rect, Vec2};
use tracing::{debug, warn};

use crate::channel::Subscribers;
use crate::config::SwipeSettings;
use crate::delegate::{ItemView, SwipeRowDelegate};
use crate::error::ConfigurationError;
use crate::gesture::PanEvent;
use crate::row::{AnimationToken, RowEffect, RowEffects, RowId, SwipeRow};

/// A [`RowEffect`] tagged with the row it applies to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ListEffect {
    /// Row the effect applies to.
    pub row: RowId,
    /// The effect.
    pub effect: RowEffect,
}

/// Effects produced by one list operation, in application order.
pub type ListEffects = Vec<ListEffect>;

/// Rows of one list plus the coordination between them.
#[derive(Debug)]
pub struct SwipeList<V> {
    rows: HashMap<RowId, SwipeRow<V>>,
    drag_channel: Subscribers<RowId>,
    scroll_observers: Subscribers<RowId>,
    scroll_offset: Vec2,
    settings: SwipeSettings,
    next_id: u64,
}

impl<V> Default for SwipeList<V> {
    fn default() -> Self {
        Self::new(SwipeSettings::default())
    }
}

impl<V> SwipeList<V> {
    /// Creates an empty list. Rows created through [`create_row`](Self::create_row)
    /// use `settings`.
    #[must_use]
    pub fn new(settings: SwipeSettings) -> Self {
        Self {
            rows: HashMap::new(),
            drag_channel: Subscribers::new(),
            scroll_observers: Subscribers::new(),
            scroll_offset: Vec2::ZERO,
            settings,
            next_id: 0,
        }
    }

    /// Creates a row with a fresh id and inserts it.
    pub fn create_row(&mut self) -> RowId {
        loop {
            self.next_id += 1;
            let id = RowId::new(self.next_id);
            if !self.rows.contains_key(&id) {
                self.insert_row(SwipeRow::new(id, self.settings.clone()));
                return id;
            }
        }
    }

    /// Inserts a row built elsewhere and subscribes it.
    ///
    /// Returns the row previously stored under the same id, already detached.
    pub fn insert_row(&mut self, mut row: SwipeRow<V>) -> Option<SwipeRow<V>> {
        let id = row.id();
        let previous = self.remove_row(id);
        self.drag_channel.subscribe(id);
        self.scroll_observers.subscribe(id);
        row.set_in_list(true);
        self.rows.insert(id, row);
        debug!(row = id.get(), rows = self.rows.len(), "row inserted");
        previous
    }

    /// Removes a row, unsubscribing it from drag announcements and scrolling.
    pub fn remove_row(&mut self, id: RowId) -> Option<SwipeRow<V>> {
        let mut row = self.rows.remove(&id)?;
        self.drag_channel.unsubscribe(id);
        self.scroll_observers.unsubscribe(id);
        row.set_in_list(false);
        debug!(row = id.get(), rows = self.rows.len(), "row removed");
        Some(row)
    }

    /// Row `id`, if present.
    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&SwipeRow<V>> {
        self.rows.get(&id)
    }

    /// Mutable row `id`, if present.
    ///
    /// Effects produced by calling row methods directly are not coordinated
    /// with other rows.
    pub fn row_mut(&mut self, id: RowId) -> Option<&mut SwipeRow<V>> {
        self.rows.get_mut(&id)
    }

    /// Returns `true` if row `id` is in the list.
    #[must_use]
    pub fn contains(&self, id: RowId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row ids in insertion order.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.drag_channel.iter()
    }

    /// Ids of rows that are open or opening.
    pub fn open_rows(&self) -> impl Iterator<Item = RowId> + '_ {
        self.row_ids()
            .filter(|id| self.rows.get(id).is_some_and(SwipeRow::is_open))
    }

    /// Current scroll offset of the list.
    #[must_use]
    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll_offset
    }

    /// Records a new scroll offset. Any change closes every open row.
    pub fn set_scroll_offset(&mut self, offset: Vec2) -> ListEffects {
        let mut effects = ListEffects::new();
        if self.scroll_offset == offset {
            return effects;
        }
        self.scroll_offset = offset;
        for id in self.scroll_observers.iter() {
            if let Some(row) = self.rows.get_mut(&id) {
                extend(&mut effects, id, row.on_scroll_offset_changed());
            }
        }
        effects
    }

    /// Updates the layout bounds of row `id`.
    pub fn set_content_bounds(&mut self, id: RowId, bounds: Rect) -> ListEffects {
        self.with_row(id, |row| row.set_content_bounds(bounds))
    }

    /// Whether a pan with `velocity` may begin on row `id`.
    #[must_use]
    pub fn should_begin_pan(&self, id: RowId, velocity: Vec2) -> bool {
        self.rows
            .get(&id)
            .is_some_and(|row| row.should_begin_pan(velocity))
    }

    /// Closes row `id`.
    pub fn close(&mut self, id: RowId) -> ListEffects {
        self.with_row(id, SwipeRow::close)
    }

    /// Tap on the content surface of row `id`.
    pub fn tap_content(&mut self, id: RowId) -> ListEffects {
        self.with_row(id, SwipeRow::tap_content)
    }

    /// Tap on a control nested in the view of item `index` of row `id`.
    pub fn tap_item_control(&mut self, id: RowId, index: usize, control: usize) -> ListEffects {
        self.with_row(id, |row| row.tap_item_control(index, control))
    }

    /// Prepares row `id` for reuse.
    pub fn prepare_for_reuse(&mut self, id: RowId) -> ListEffects {
        self.with_row(id, SwipeRow::prepare_for_reuse)
    }

    fn with_row(
        &mut self,
        id: RowId,
        f: impl FnOnce(&mut SwipeRow<V>) -> RowEffects,
    ) -> ListEffects {
        let mut effects = ListEffects::new();
        match self.rows.get_mut(&id) {
            Some(row) => extend(&mut effects, id, f(row)),
            None => warn!(row = id.get(), "unknown row ignored"),
        }
        effects
    }

    fn try_with_row(
        &mut self,
        id: RowId,
        f: impl FnOnce(&mut SwipeRow<V>) -> Result<RowEffects, ConfigurationError>,
    ) -> Result<ListEffects, ConfigurationError> {
        let mut effects = ListEffects::new();
        let Some(row) = self.rows.get_mut(&id) else {
            warn!(row = id.get(), "unknown row ignored");
            return Ok(effects);
        };
        let produced = f(row)?;
        for effect in produced {
            if effect == RowEffect::AnnounceDragBegan {
                self.announce_drag(id, &mut effects);
            } else {
                effects.push(ListEffect { row: id, effect });
            }
        }
        Ok(effects)
    }

    fn announce_drag(&mut self, from: RowId, effects: &mut ListEffects) {
        let recipients = self.drag_channel.publish(from);
        debug!(row = from.get(), recipients = recipients.len(), "drag began");
        for id in recipients {
            if let Some(row) = self.rows.get_mut(&id) {
                extend(effects, id, row.on_peer_drag_began(from));
            }
        }
    }
}

impl<V: ItemView> SwipeList<V> {
    /// Attaches `delegate` to row `id`. See [`SwipeRow::attach_delegate`].
    pub fn attach_delegate<D>(
        &mut self,
        id: RowId,
        delegate: Option<&D>,
    ) -> Result<ListEffects, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.try_with_row(id, |row| row.attach_delegate(delegate))
    }

    /// Feeds a pan update to row `id`.
    ///
    /// On [`PanPhase::Began`](crate::gesture::PanPhase::Began) every other open
    /// row closes; their effects follow in the returned list.
    pub fn handle_pan<D>(
        &mut self,
        id: RowId,
        event: PanEvent,
        delegate: &mut D,
    ) -> Result<ListEffects, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.try_with_row(id, |row| row.handle_pan(event, delegate))
    }

    /// Opens row `id`. Other rows are left alone.
    pub fn open<D>(
        &mut self,
        id: RowId,
        delegate: &mut D,
    ) -> Result<ListEffects, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.try_with_row(id, |row| row.open(delegate))
    }

    /// Tap on the slot of item `index` of row `id`.
    pub fn tap_item<D>(&mut self, id: RowId, index: usize, delegate: &mut D) -> ListEffects
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.with_row(id, |row| row.tap_item(index, delegate))
    }

    /// Reports that the animation `token` of row `id` completed.
    pub fn finish_animation<D>(
        &mut self,
        id: RowId,
        token: AnimationToken,
        delegate: &mut D,
    ) -> ListEffects
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.with_row(id, |row| row.finish_animation(token, delegate))
    }
}

fn extend(effects: &mut ListEffects, row: RowId, produced: RowEffects) {
    effects.extend(produced.into_iter().map(|effect| ListEffect { row, effect }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingDelegate, TestView};

    fn list_with_rows(
        delegate: &RecordingDelegate,
        count: usize,
    ) -> (SwipeList<TestView>, Vec<RowId>) {
        let mut list = SwipeList::default();
        let ids: Vec<RowId> = (0..count).map(|_| list.create_row()).collect();
        for &id in &ids {
            list.set_content_bounds(id, Rect::new(0.0, 0.0, 320.0, 80.0));
            list.attach_delegate(id, Some(delegate)).unwrap();
        }
        (list, ids)
    }

    fn token_for(effects: &[ListEffect], row: RowId) -> Option<AnimationToken> {
        effects.iter().find_map(|e| match e.effect {
            RowEffect::AnimateContentFrame { token, .. } if e.row == row => Some(token),
            _ => None,
        })
    }

    fn open_row(list: &mut SwipeList<TestView>, delegate: &mut RecordingDelegate, id: RowId) {
        let effects = list.open(id, delegate).unwrap();
        let token = token_for(&effects, id).unwrap();
        list.finish_animation(id, token, delegate);
    }

    #[test]
    fn created_rows_are_subscribed() {
        let delegate = RecordingDelegate::new(&[80.0]);
        let (list, ids) = list_with_rows(&delegate, 3);
        assert_eq!(list.len(), 3);
        assert_eq!(list.row_ids().collect::<Vec<_>>(), ids);
        assert!(ids.iter().all(|&id| list.row(id).unwrap().is_in_list()));
    }

    #[test]
    fn removed_rows_stop_receiving_announcements() {
        let mut delegate = RecordingDelegate::new(&[80.0]);
        let (mut list, ids) = list_with_rows(&delegate, 2);
        open_row(&mut list, &mut delegate, ids[0]);

        let mut removed = list.remove_row(ids[0]).unwrap();
        assert!(!removed.is_in_list());
        assert!(list.remove_row(ids[0]).is_none());

        let effects = list
            .handle_pan(ids[1], PanEvent::began(Vec2::new(-500.0, 0.0)), &mut delegate)
            .unwrap();
        assert!(effects.is_empty());
        assert!(removed.is_open());
        assert!(!removed.close().is_empty());
    }

    #[test]
    fn removed_rows_stop_observing_scroll() {
        let mut delegate = RecordingDelegate::new(&[80.0]);
        let (mut list, ids) = list_with_rows(&delegate, 1);
        open_row(&mut list, &mut delegate, ids[0]);

        let removed = list.remove_row(ids[0]).unwrap();
        assert!(list.set_scroll_offset(Vec2::new(0.0, 25.0)).is_empty());
        assert!(removed.is_open());
        assert_eq!(removed.animation_in_flight(), None);
        assert!(delegate.ended.is_empty());
    }

    #[test]
    fn drag_began_closes_other_open_rows() {
        let mut delegate = RecordingDelegate::new(&[80.0]);
        let (mut list, ids) = list_with_rows(&delegate, 3);
        open_row(&mut list, &mut delegate, ids[0]);
        assert_eq!(list.open_rows().collect::<Vec<_>>(), [ids[0]]);

        let effects = list
            .handle_pan(ids[2], PanEvent::began(Vec2::new(-500.0, 0.0)), &mut delegate)
            .unwrap();
        assert!(token_for(&effects, ids[0]).is_some());
        assert!(effects.iter().all(|e| e.row == ids[0]));
        assert!(effects.iter().all(|e| e.effect != RowEffect::AnnounceDragBegan));
        assert_eq!(list.open_rows().count(), 0);
    }

    #[test]
    fn own_announcement_keeps_row_open() {
        let mut delegate = RecordingDelegate::new(&[80.0]);
        let (mut list, ids) = list_with_rows(&delegate, 2);
        open_row(&mut list, &mut delegate, ids[0]);

        let effects = list
            .handle_pan(ids[0], PanEvent::began(Vec2::new(300.0, 0.0)), &mut delegate)
            .unwrap();
        assert!(effects.is_empty());
        assert!(list.row(ids[0]).unwrap().is_open());
    }

    #[test]
    fn scroll_change_closes_open_rows_once() {
        let mut delegate = RecordingDelegate::new(&[80.0]);
        let (mut list, ids) = list_with_rows(&delegate, 2);
        open_row(&mut list, &mut delegate, ids[1]);

        assert!(list.set_scroll_offset(Vec2::ZERO).is_empty());
        let effects = list.set_scroll_offset(Vec2::new(0.0, 12.0));
        let token = token_for(&effects, ids[1]).unwrap();
        assert!(list.set_scroll_offset(Vec2::new(0.0, 30.0)).is_empty());
        assert_eq!(list.scroll_offset(), Vec2::new(0.0, 30.0));

        list.finish_animation(ids[1], token, &mut delegate);
        assert_eq!(delegate.ended, [ids[1]]);
    }

    #[test]
    fn unknown_rows_are_ignored() {
        let mut delegate = RecordingDelegate::new(&[80.0]);
        let mut list = SwipeList::<TestView>::default();
        let ghost = RowId::new(42);
        assert!(list.close(ghost).is_empty());
        assert!(list.tap_content(ghost).is_empty());
        assert!(!list.should_begin_pan(ghost, Vec2::new(-500.0, 0.0)));
        assert!(
            list.handle_pan(ghost, PanEvent::began(Vec2::ZERO), &mut delegate)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn insert_replaces_row_with_same_id() {
        let mut list = SwipeList::<TestView>::default();
        let id = list.create_row();
        let previous = list.insert_row(SwipeRow::new(id, SwipeSettings::default()));
        assert!(previous.is_some_and(|row| !row.is_in_list()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.row_ids().count(), 1);
    }

    #[test]
    fn create_row_skips_ids_taken_by_inserted_rows() {
        let mut list = SwipeList::<TestView>::default();
        list.insert_row(SwipeRow::new(RowId::new(1), SwipeSettings::default()));
        let id = list.create_row();
        assert_eq!(id, RowId::new(2));
    }

    #[test]
    fn configuration_errors_propagate() {
        let mut delegate = RecordingDelegate::new(&[80.0, 0.0]);
        let mut list = SwipeList::<TestView>::default();
        let id = list.create_row();
        let err = list.attach_delegate(id, Some(&delegate)).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidItemWidth {
                index: 1,
                width: 0.0
            }
        );
        assert!(list.row(id).unwrap().configuration().is_none());
        assert!(list.open(id, &mut delegate).unwrap().is_empty());
    }
}
