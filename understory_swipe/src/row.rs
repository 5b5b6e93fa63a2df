// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The swipe row state machine.
//!
//! A [`SwipeRow`] is either closed (content at rest offset `0`) or open
//! (content shifted left by the configuration's total width). Pan input moves
//! the content 1:1 while dragging; releasing picks the final state from the
//! horizontal velocity alone. Opening and closing are animated by the host,
//! which reports completion through [`SwipeRow::finish_animation`].
//!
//! The row never touches the host's scene directly. Every operation returns
//! the [`RowEffect`]s the host should apply, in order.

use core::time::Duration;

use kurbo::{Rect, Vec2};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::actions::ActionContainer;
use crate::config::{OverlapPolicy, RowConfiguration, SwipeSettings};
use crate::delegate::{ItemView, SwipeRowDelegate};
use crate::error::ConfigurationError;
use crate::gesture::{PanEvent, PanPhase, admits_horizontal_pan};

/// Identity of a row, used to filter a row's own broadcasts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    /// Wraps a host-chosen identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle for one open or close animation.
///
/// Tokens increase monotonically per row. Only the most recent one is live.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AnimationToken(u64);

bitflags::bitflags! {
    /// Gesture recognizers the row wants attached to its content surface.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SurfaceGestures: u8 {
        /// Horizontal pan that drives the swipe.
        const PAN = 0b0000_0001;
        /// Tap that closes an open row.
        const TAP = 0b0000_0010;
    }
}

/// A change the host applies to its scene on behalf of a row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RowEffect {
    /// A pan began on this row; every other open row in the same list should close.
    ///
    /// [`SwipeList`](crate::SwipeList) delivers this itself and does not forward it.
    AnnounceDragBegan,
    /// Move the content surface to `frame` without animating.
    SetContentFrame(Rect),
    /// Animate the content surface to `frame`, then call
    /// [`SwipeRow::finish_animation`] with `token`.
    AnimateContentFrame {
        /// Destination frame.
        frame: Rect,
        /// Animation duration.
        duration: Duration,
        /// Token to report on completion.
        token: AnimationToken,
    },
    /// An action container was built. Place [`SwipeRow::actions`] directly behind
    /// the content surface.
    ActionsInserted,
    /// The action container was dropped. Remove its views from the scene.
    ActionsRemoved,
    /// Attach these recognizers to the content surface.
    AttachGesture(SurfaceGestures),
    /// Detach these recognizers from the content surface.
    DetachGesture(SurfaceGestures),
}

/// Effects produced by one row operation.
pub type RowEffects = SmallVec<[RowEffect; 4]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Settle {
    Open,
    Closed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct InFlight {
    token: AnimationToken,
    settle: Settle,
}

/// One swipeable list row.
#[derive(Debug)]
pub struct SwipeRow<V> {
    id: RowId,
    settings: SwipeSettings,
    configuration: Option<RowConfiguration>,
    content_bounds: Rect,
    offset: f64,
    is_open: bool,
    actions: Option<ActionContainer<V>>,
    gestures: SurfaceGestures,
    in_flight: Option<InFlight>,
    next_token: u64,
    // `did_begin_editing` was reported without a matching `did_end_editing`.
    editing: bool,
    // An opening animation was superseded before it reported.
    open_unreported: bool,
    in_list: bool,
}

impl<V> SwipeRow<V> {
    /// Creates a closed row without a configuration.
    ///
    /// The pan recognizer starts attached; attaching a delegate with no items
    /// detaches it.
    #[must_use]
    pub fn new(id: RowId, settings: SwipeSettings) -> Self {
        Self {
            id,
            settings,
            configuration: None,
            content_bounds: Rect::ZERO,
            offset: 0.0,
            is_open: false,
            actions: None,
            gestures: SurfaceGestures::PAN,
            in_flight: None,
            next_token: 0,
            editing: false,
            open_unreported: false,
            in_list: false,
        }
    }

    /// This row's identity.
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Settings the row was created with.
    #[must_use]
    pub fn settings(&self) -> &SwipeSettings {
        &self.settings
    }

    /// The configuration from the last successful delegate attachment.
    #[must_use]
    pub fn configuration(&self) -> Option<&RowConfiguration> {
        self.configuration.as_ref()
    }

    /// Returns `true` if the row is open or opening.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Current horizontal offset of the content surface from its rest position.
    ///
    /// While an animation runs this is already the destination offset.
    #[must_use]
    pub fn content_offset(&self) -> f64 {
        self.offset
    }

    /// Bounds the host laid the row out in.
    #[must_use]
    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    /// Frame of the content surface: the bounds shifted by the current offset.
    #[must_use]
    pub fn content_frame(&self) -> Rect {
        self.content_bounds + Vec2::new(self.offset, 0.0)
    }

    /// The materialized action container, if any.
    #[must_use]
    pub fn actions(&self) -> Option<&ActionContainer<V>> {
        self.actions.as_ref()
    }

    /// Mutable access to the materialized action container.
    pub fn actions_mut(&mut self) -> Option<&mut ActionContainer<V>> {
        self.actions.as_mut()
    }

    /// Recognizers currently attached to the content surface.
    #[must_use]
    pub fn gestures(&self) -> SurfaceGestures {
        self.gestures
    }

    /// Token of the animation in flight, if any.
    #[must_use]
    pub fn animation_in_flight(&self) -> Option<AnimationToken> {
        self.in_flight.map(|f| f.token)
    }

    /// Returns `true` while the row belongs to a [`SwipeList`](crate::SwipeList).
    #[must_use]
    pub fn is_in_list(&self) -> bool {
        self.in_list
    }

    pub(crate) fn set_in_list(&mut self, in_list: bool) {
        self.in_list = in_list;
    }

    /// Updates the bounds the host laid the row out in.
    ///
    /// The content keeps its offset relative to the new bounds. Existing action
    /// slots keep their layout until the next reveal.
    pub fn set_content_bounds(&mut self, bounds: Rect) -> RowEffects {
        let mut effects = RowEffects::new();
        if self.content_bounds != bounds {
            self.content_bounds = bounds;
            effects.push(RowEffect::SetContentFrame(self.content_frame()));
        }
        effects
    }

    /// Returns `true` if a pan with `velocity` may begin on this row.
    ///
    /// The pan recognizer must be attached and the motion must be horizontal
    /// enough per [`SwipeSettings::admission_ratio`].
    #[must_use]
    pub fn should_begin_pan(&self, velocity: Vec2) -> bool {
        if !self.gestures.contains(SurfaceGestures::PAN) || self.ignores_input() {
            return false;
        }
        admits_horizontal_pan(velocity, self.settings.admission_ratio())
    }

    /// Closes the row with an animation.
    ///
    /// Closing a row that is already closed and settled does nothing.
    pub fn close(&mut self) -> RowEffects {
        let mut effects = RowEffects::new();
        self.close_into(&mut effects);
        effects
    }

    /// Tap on the content surface. An open row always closes.
    pub fn tap_content(&mut self) -> RowEffects {
        if self.is_open {
            self.close()
        } else {
            RowEffects::new()
        }
    }

    /// Tap on one of the controls nested inside the view of item `index`.
    ///
    /// The control handles its own action; the row just closes.
    pub fn tap_item_control(&mut self, index: usize, control: usize) -> RowEffects {
        let known = self
            .actions
            .as_ref()
            .and_then(|actions| actions.slot(index))
            .is_some_and(|slot| control < slot.tappable_controls());
        if !known {
            debug!(row = self.id.0, index, control, "tap on unknown item control ignored");
            return RowEffects::new();
        }
        self.close()
    }

    /// Another row in the same list began dragging.
    pub fn on_peer_drag_began(&mut self, from: RowId) -> RowEffects {
        if from == self.id || !self.is_open {
            return RowEffects::new();
        }
        debug!(row = self.id.0, peer = from.0, "closing for peer drag");
        self.close()
    }

    /// The enclosing list scrolled.
    pub fn on_scroll_offset_changed(&mut self) -> RowEffects {
        if !self.is_open {
            return RowEffects::new();
        }
        debug!(row = self.id.0, "closing for scroll");
        self.close()
    }

    /// The host is about to reuse this row for different content.
    pub fn prepare_for_reuse(&mut self) -> RowEffects {
        self.close()
    }

    fn ignores_input(&self) -> bool {
        self.in_flight.is_some()
            && self.settings.overlap_policy() == OverlapPolicy::IgnoreUntilSettled
    }

    fn total_width(&self) -> f64 {
        self.configuration
            .as_ref()
            .map_or(0.0, RowConfiguration::total_width)
    }

    fn set_offset(&mut self, offset: f64, effects: &mut RowEffects) {
        self.offset = offset;
        effects.push(RowEffect::SetContentFrame(self.content_frame()));
    }

    fn animate(&mut self, settle: Settle, effects: &mut RowEffects) {
        self.next_token += 1;
        let token = AnimationToken(self.next_token);
        self.supersede();
        self.in_flight = Some(InFlight { token, settle });
        effects.push(RowEffect::AnimateContentFrame {
            frame: self.content_frame(),
            duration: self.settings.animation_duration(),
            token,
        });
    }

    /// Makes the animation in flight, if any, stale.
    fn supersede(&mut self) {
        let Some(previous) = self.in_flight.take() else {
            return;
        };
        trace!(row = self.id.0, previous = previous.token.0, "superseding animation");
        if previous.settle == Settle::Open {
            self.open_unreported = true;
        }
    }

    fn close_into(&mut self, effects: &mut RowEffects) {
        let closing = matches!(
            self.in_flight,
            Some(InFlight {
                settle: Settle::Closed,
                ..
            })
        );
        let settled = self.actions.is_none() && self.in_flight.is_none();
        if !self.is_open && self.offset == 0.0 && (settled || closing) {
            return;
        }
        debug!(row = self.id.0, "closing");
        self.is_open = false;
        self.offset = 0.0;
        self.animate(Settle::Closed, effects);
    }
}

impl<V: ItemView> SwipeRow<V> {
    /// Reads the action configuration from `delegate`.
    ///
    /// Fails with [`ConfigurationError::MissingDelegate`] when `delegate` is
    /// `None`, and with [`ConfigurationError::InvalidItemWidth`] on the first bad
    /// width. On failure the previous configuration stays in place.
    ///
    /// A delegate without items detaches the pan recognizer, which makes the
    /// row unswipeable; a later delegate with items attaches it again.
    pub fn attach_delegate<D>(
        &mut self,
        delegate: Option<&D>,
    ) -> Result<RowEffects, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        let delegate = delegate.ok_or(ConfigurationError::MissingDelegate)?;
        let configuration = RowConfiguration::from_delegate(delegate, self.id)?;
        debug!(
            row = self.id.0,
            items = configuration.item_count(),
            total_width = configuration.total_width(),
            "delegate attached"
        );

        let mut effects = RowEffects::new();
        let has_pan = self.gestures.contains(SurfaceGestures::PAN);
        if configuration.has_items() && !has_pan {
            self.gestures.insert(SurfaceGestures::PAN);
            effects.push(RowEffect::AttachGesture(SurfaceGestures::PAN));
        } else if !configuration.has_items() && has_pan {
            self.gestures.remove(SurfaceGestures::PAN);
            effects.push(RowEffect::DetachGesture(SurfaceGestures::PAN));
        }
        self.configuration = Some(configuration);
        Ok(effects)
    }

    /// Feeds one pan update into the state machine.
    ///
    /// - `Began` asks other rows to close ([`RowEffect::AnnounceDragBegan`]).
    /// - `Changed` tracks the pointer, building the action container on the
    ///   first leftward movement. The content never moves past full reveal nor
    ///   right of its rest position.
    /// - `Ended` and `Cancelled` close on rightward velocity and open otherwise,
    ///   wherever the content currently is.
    ///
    /// Errors only if the delegate fails to provide an item view.
    pub fn handle_pan<D>(
        &mut self,
        event: PanEvent,
        delegate: &mut D,
    ) -> Result<RowEffects, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        let mut effects = RowEffects::new();
        if !self.gestures.contains(SurfaceGestures::PAN) || self.ignores_input() {
            trace!(row = self.id.0, phase = ?event.phase, "pan ignored");
            return Ok(effects);
        }
        if !self.configuration.as_ref().is_some_and(RowConfiguration::has_items) {
            trace!(row = self.id.0, "pan on row without actions ignored");
            return Ok(effects);
        }

        match event.phase {
            PanPhase::Began => effects.push(RowEffect::AnnounceDragBegan),
            PanPhase::Changed => self.track(event.translation.x, delegate, &mut effects)?,
            PanPhase::Ended | PanPhase::Cancelled => {
                if event.velocity.x > 0.0 {
                    self.close_into(&mut effects);
                } else {
                    self.open_into(delegate, &mut effects)?;
                }
            }
        }
        Ok(effects)
    }

    /// Opens the row with an animation, building the action container if needed.
    pub fn open<D>(&mut self, delegate: &mut D) -> Result<RowEffects, ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        let mut effects = RowEffects::new();
        if self.ignores_input() {
            trace!(row = self.id.0, "open ignored until settled");
            return Ok(effects);
        }
        if !self.configuration.as_ref().is_some_and(RowConfiguration::has_items) {
            return Ok(effects);
        }
        self.open_into(delegate, &mut effects)?;
        Ok(effects)
    }

    /// Tap on the slot of item `index`.
    ///
    /// Reports [`SwipeRowDelegate::item_tapped`] and closes, unless the slot's
    /// view has nested controls, in which case the slot itself ignores taps.
    pub fn tap_item<D>(&mut self, index: usize, delegate: &mut D) -> RowEffects
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        let Some(slot) = self.actions.as_ref().and_then(|actions| actions.slot(index)) else {
            debug!(row = self.id.0, index, "tap on unknown item ignored");
            return RowEffects::new();
        };
        if !slot.forwards_tap() {
            return RowEffects::new();
        }
        delegate.item_tapped(self.id, index);
        self.close()
    }

    /// Completes the animation identified by `token`.
    ///
    /// Opening attaches the tap-to-close recognizer and reports
    /// [`SwipeRowDelegate::did_begin_editing`]. Closing drops the action
    /// container, detaches the tap recognizer, and reports
    /// [`SwipeRowDelegate::did_end_editing`]. Tokens of superseded animations
    /// are ignored; an opening that was superseded by a close is reported
    /// right before that close, so the two callbacks always come in pairs.
    ///
    /// A drag supersedes the animation in flight, so a close that completes
    /// after the user grabbed the row again is ignored.
    pub fn finish_animation<D>(&mut self, token: AnimationToken, delegate: &mut D) -> RowEffects
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        let mut effects = RowEffects::new();
        let Some(in_flight) = self.in_flight.filter(|f| f.token == token) else {
            trace!(row = self.id.0, token = token.0, "stale animation completion");
            return effects;
        };
        self.in_flight = None;

        match in_flight.settle {
            Settle::Open => {
                if !self.gestures.contains(SurfaceGestures::TAP) {
                    self.gestures.insert(SurfaceGestures::TAP);
                    effects.push(RowEffect::AttachGesture(SurfaceGestures::TAP));
                }
                debug!(row = self.id.0, "opened");
                self.open_unreported = false;
                if !self.editing {
                    self.editing = true;
                    delegate.did_begin_editing(self.id);
                }
            }
            Settle::Closed => {
                if self.actions.take().is_some() {
                    effects.push(RowEffect::ActionsRemoved);
                }
                if self.gestures.contains(SurfaceGestures::TAP) {
                    self.gestures.remove(SurfaceGestures::TAP);
                    effects.push(RowEffect::DetachGesture(SurfaceGestures::TAP));
                }
                debug!(row = self.id.0, "closed");
                if self.open_unreported && !self.editing {
                    delegate.did_begin_editing(self.id);
                }
                self.open_unreported = false;
                self.editing = false;
                delegate.did_end_editing(self.id);
            }
        }
        effects
    }

    fn track<D>(
        &mut self,
        tx: f64,
        delegate: &mut D,
        effects: &mut RowEffects,
    ) -> Result<(), ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.supersede();
        let total = self.total_width();
        if tx < 0.0 {
            self.ensure_actions(delegate, effects)?;
            if !self.is_open && -tx > total {
                self.set_offset(-total, effects);
                return Ok(());
            }
        }

        // From the open rest offset, any further leftward motion would overshoot.
        let rest = if self.is_open { -total } else { 0.0 };
        if self.is_open && rest + tx < -total {
            return Ok(());
        }

        let offset = if self.is_open {
            -total + tx.clamp(0.0, total)
        } else {
            tx.min(0.0)
        };
        self.set_offset(offset, effects);
        Ok(())
    }

    fn open_into<D>(
        &mut self,
        delegate: &mut D,
        effects: &mut RowEffects,
    ) -> Result<(), ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        self.ensure_actions(delegate, effects)?;
        debug!(row = self.id.0, "opening");
        self.is_open = true;
        self.offset = -self.total_width();
        self.animate(Settle::Open, effects);
        Ok(())
    }

    fn ensure_actions<D>(
        &mut self,
        delegate: &mut D,
        effects: &mut RowEffects,
    ) -> Result<(), ConfigurationError>
    where
        D: SwipeRowDelegate<View = V> + ?Sized,
    {
        if self.actions.is_some() {
            return Ok(());
        }
        let Some(configuration) = &self.configuration else {
            return Ok(());
        };
        let built =
            ActionContainer::build(configuration, self.content_bounds.size(), delegate, self.id)?;
        if let Some(container) = built {
            trace!(row = self.id.0, slots = container.len(), "actions materialized");
            self.actions = Some(container);
            effects.push(RowEffect::ActionsInserted);
        }
        Ok(())
    }
}
