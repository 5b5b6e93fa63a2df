// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small publish/subscribe registry.
//!
//! [`Subscribers`] only tracks membership. Publishing returns the recipients
//! and leaves delivery to the caller, which lets the owner mutate recipients
//! while it iterates. Delivery order is subscription order.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// Ordered set of subscriber keys.
#[derive(Clone, Debug)]
pub struct Subscribers<K> {
    order: Vec<K>,
    members: HashSet<K>,
}

impl<K> Default for Subscribers<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<K> Subscribers<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key`. Returns `false` if it was already subscribed.
    pub fn subscribe(&mut self, key: K) -> bool {
        if !self.members.insert(key) {
            return false;
        }
        self.order.push(key);
        true
    }

    /// Removes `key`. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, key: K) -> bool {
        if !self.members.remove(&key) {
            return false;
        }
        self.order.retain(|k| *k != key);
        true
    }

    /// Returns `true` if `key` is subscribed.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.members.contains(&key)
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Subscribers in subscription order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Recipients of a message published by `from`: everyone except `from`.
    ///
    /// The recipients are collected up front, so the registry may change
    /// while they are being notified.
    #[must_use]
    pub fn publish(&self, from: K) -> Vec<K> {
        self.order.iter().copied().filter(|k| *k != from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_is_idempotent_and_ordered() {
        let mut subs = Subscribers::new();
        assert!(subs.subscribe(3));
        assert!(subs.subscribe(1));
        assert!(!subs.subscribe(3));
        assert_eq!(subs.len(), 2);
        assert_eq!(subs.iter().collect::<Vec<_>>(), [3, 1]);
    }

    #[test]
    fn unsubscribe_removes_only_members() {
        let mut subs = Subscribers::new();
        subs.subscribe(1);
        subs.subscribe(2);
        assert!(subs.unsubscribe(1));
        assert!(!subs.unsubscribe(1));
        assert!(!subs.contains(1));
        assert_eq!(subs.iter().collect::<Vec<_>>(), [2]);
        assert!(subs.unsubscribe(2));
        assert!(subs.is_empty());
    }

    #[test]
    fn publish_skips_the_sender() {
        let mut subs = Subscribers::new();
        for key in [1, 2, 3] {
            subs.subscribe(key);
        }
        assert_eq!(subs.publish(2), [1, 3]);
        // Senders need not be subscribed themselves.
        assert_eq!(subs.publish(9), [1, 2, 3]);
        assert!(Subscribers::<u32>::new().publish(1).is_empty());
    }
}
