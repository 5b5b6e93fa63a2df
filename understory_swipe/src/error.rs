// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors reported by rows and lists.

/// Error returned when a delegate describes an unusable row.
///
/// These are integration bugs in the host rather than transient conditions,
/// so nothing here is retried. The row keeps whatever state it had before the
/// failing call.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// A row was attached without a delegate.
    #[error("a swipe row must always have a delegate")]
    MissingDelegate,
    /// The delegate reported a zero, negative, or non-finite item width.
    #[error("item {index} has invalid width {width}; widths must be finite and greater than zero")]
    InvalidItemWidth {
        /// Index of the offending item.
        index: usize,
        /// Width reported by the delegate.
        width: f64,
    },
    /// The delegate returned no view for an item it declared.
    #[error("delegate returned no view for item {index}")]
    MissingItemView {
        /// Index of the item without a view.
        index: usize,
    },
}
