// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Swipe: a headless swipe-to-reveal list row.
//!
//! This crate implements the interaction logic of a list row whose content
//! slides left to reveal trailing action buttons. It does not draw anything.
//! Hosts feed it layout, pan input, and animation completions, and apply the
//! effects it returns to their own scene.
//!
//! The core concepts are:
//!
//! - [`SwipeRow`]: the open/closed state machine for one row. It interprets pan
//!   phases, clamps the content offset to the reveal width, builds and drops the
//!   action container, and reports [`RowEffect`]s.
//! - [`SwipeRowDelegate`]: supplies the number, widths, and views of a row's
//!   actions, and optionally hears about taps and open/close completions.
//! - [`ActionContainer`]: the slots revealed behind the content, laid out right
//!   to left from the trailing edge.
//! - [`SwipeList`]: owns rows and coordinates them, closing open rows when
//!   another row starts dragging or when the list scrolls.
//! - [`gesture`]: pan phases, the horizontal admission rule, and a
//!   [`PanTracker`](gesture::PanTracker) for hosts that only see raw pointer events.
//!
//! Hosts are responsible for:
//!
//! - Placing the content surface at the frames reported by
//!   [`RowEffect::SetContentFrame`] and [`RowEffect::AnimateContentFrame`].
//! - Running animations and calling [`SwipeRow::finish_animation`] (or
//!   [`SwipeList::finish_animation`]) when they complete.
//! - Inserting the action container behind the content on
//!   [`RowEffect::ActionsInserted`] and removing it on [`RowEffect::ActionsRemoved`].
//! - Routing taps to [`SwipeList::tap_content`], [`SwipeList::tap_item`], and
//!   [`SwipeList::tap_item_control`].
//!
//! Invalid delegate answers are reported as [`ConfigurationError`]s instead of
//! panicking.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use understory_swipe::gesture::PanEvent;
//! use understory_swipe::{ItemView, RowEffect, RowId, SwipeList, SwipeRowDelegate};
//!
//! struct Label(&'static str);
//! impl ItemView for Label {}
//!
//! struct Actions;
//! impl SwipeRowDelegate for Actions {
//!     type View = Label;
//!     fn item_count(&self, _row: RowId) -> usize {
//!         2
//!     }
//!     fn item_width(&self, _row: RowId, _index: usize) -> f64 {
//!         80.0
//!     }
//!     fn item_view(&mut self, _row: RowId, index: usize) -> Option<Label> {
//!         Some(Label(if index == 0 { "Delete" } else { "Archive" }))
//!     }
//! }
//!
//! let mut delegate = Actions;
//! let mut list = SwipeList::default();
//! let row = list.create_row();
//! list.set_content_bounds(row, Rect::new(0.0, 0.0, 320.0, 60.0));
//! list.attach_delegate(row, Some(&delegate)).unwrap();
//!
//! // The host's recognizer asks before starting a pan.
//! let velocity = Vec2::new(-600.0, 40.0);
//! assert!(list.should_begin_pan(row, velocity));
//! list.handle_pan(row, PanEvent::began(velocity), &mut delegate).unwrap();
//!
//! // Dragging past the reveal width stops at full reveal.
//! let drag = PanEvent::changed(Vec2::new(-200.0, 0.0), velocity);
//! list.handle_pan(row, drag, &mut delegate).unwrap();
//! assert_eq!(list.row(row).unwrap().content_offset(), -160.0);
//!
//! // Releasing with leftward velocity opens; the host animates and reports back.
//! let release = PanEvent::ended(Vec2::new(-200.0, 0.0), Vec2::new(-50.0, 0.0));
//! let effects = list.handle_pan(row, release, &mut delegate).unwrap();
//! let token = effects
//!     .iter()
//!     .find_map(|e| match e.effect {
//!         RowEffect::AnimateContentFrame { token, .. } => Some(token),
//!         _ => None,
//!     })
//!     .unwrap();
//! list.finish_animation(row, token, &mut delegate);
//! assert!(list.row(row).unwrap().is_open());
//!
//! // Any scroll closes it again.
//! assert!(!list.set_scroll_offset(Vec2::new(0.0, 10.0)).is_empty());
//! assert!(!list.row(row).unwrap().is_open());
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded and synchronous. Broadcasts between rows
//! of a [`SwipeList`] are delivered inside the call that triggered them.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod actions;
mod channel;
mod config;
mod delegate;
mod error;
pub mod gesture;
mod list;
mod row;

#[cfg(test)]
mod testing;

pub use actions::{ActionContainer, ActionSlot};
pub use channel::Subscribers;
pub use config::{OverlapPolicy, RowConfiguration, SwipeSettings};
pub use delegate::{ItemView, SwipeRowDelegate};
pub use error::ConfigurationError;
pub use list::{ListEffect, ListEffects, SwipeList};
pub use row::{AnimationToken, RowEffect, RowEffects, RowId, SurfaceGestures, SwipeRow};
