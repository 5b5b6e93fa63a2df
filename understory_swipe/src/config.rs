// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row configuration derived from a delegate, and tunable row settings.

use core::time::Duration;

use smallvec::SmallVec;

use crate::delegate::SwipeRowDelegate;
use crate::error::ConfigurationError;
use crate::row::RowId;

/// Action widths for one row, validated once per delegate attachment.
///
/// A configuration is never edited in place. Attaching a delegate again
/// replaces it wholesale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowConfiguration {
    item_widths: SmallVec<[f64; 4]>,
}

impl RowConfiguration {
    /// A configuration without actions. Rows using it cannot be swiped.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a configuration from explicit widths.
    ///
    /// Fails on the first width that is zero, negative, or not finite.
    pub fn from_widths(
        widths: impl IntoIterator<Item = f64>,
    ) -> Result<Self, ConfigurationError> {
        let mut item_widths = SmallVec::new();
        for (index, width) in widths.into_iter().enumerate() {
            if !(width.is_finite() && width > 0.0) {
                return Err(ConfigurationError::InvalidItemWidth { index, width });
            }
            item_widths.push(width);
        }
        Ok(Self { item_widths })
    }

    /// Queries `delegate` for the item count and every item width of `row`.
    ///
    /// No item views are requested here.
    pub fn from_delegate<D>(delegate: &D, row: RowId) -> Result<Self, ConfigurationError>
    where
        D: SwipeRowDelegate + ?Sized,
    {
        let count = delegate.item_count(row);
        Self::from_widths((0..count).map(|index| delegate.item_width(row, index)))
    }

    /// Number of actions.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_widths.len()
    }

    /// Returns `true` if there is at least one action.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.item_widths.is_empty()
    }

    /// Widths in item order.
    #[must_use]
    pub fn item_widths(&self) -> &[f64] {
        &self.item_widths
    }

    /// Width of the action at `index`, if it exists.
    #[must_use]
    pub fn item_width(&self, index: usize) -> Option<f64> {
        self.item_widths.get(index).copied()
    }

    /// Sum of all action widths: how far the content slides when fully open.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.item_widths.iter().sum()
    }
}

/// What a row does when asked to move while an open/close animation is still running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlapPolicy {
    /// New requests start a new animation; completions of older ones are ignored.
    ///
    /// A drag also makes the running animation stale, so the row stays where
    /// the pointer put it.
    #[default]
    Supersede,
    /// Pan input and open requests are dropped until the running animation completes.
    ///
    /// Close requests from taps, peers, or scrolling still supersede an opening
    /// animation so a row never stays open behind a scrolled list.
    IgnoreUntilSettled,
}

/// Tunables shared by rows.
#[derive(Clone, Debug, PartialEq)]
pub struct SwipeSettings {
    animation_duration: Duration,
    admission_ratio: f64,
    overlap_policy: OverlapPolicy,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_millis(250),
            admission_ratio: 3.0,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl SwipeSettings {
    /// Sets the duration of open and close animations.
    #[must_use]
    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    /// Sets how many times larger horizontal velocity must be than vertical
    /// velocity for a pan to begin.
    ///
    /// Negative or non-finite ratios are replaced by zero.
    #[must_use]
    pub fn with_admission_ratio(mut self, ratio: f64) -> Self {
        self.admission_ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
        self
    }

    /// Sets the policy for requests that arrive mid-animation.
    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Duration of open and close animations.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }

    /// Horizontal-over-vertical velocity ratio required to begin a pan.
    #[must_use]
    pub fn admission_ratio(&self) -> f64 {
        self.admission_ratio
    }

    /// Policy for requests that arrive mid-animation.
    #[must_use]
    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }
}
