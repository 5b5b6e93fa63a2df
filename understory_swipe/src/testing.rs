// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use alloc::vec;
use alloc::vec::Vec;

use crate::{ItemView, RowId, SwipeRowDelegate};

#[derive(Debug, PartialEq)]
pub(crate) struct TestView {
    pub(crate) index: usize,
    pub(crate) controls: usize,
}

impl ItemView for TestView {
    fn tappable_controls(&self) -> usize {
        self.controls
    }
}

/// Delegate with fixed widths that records every callback it receives.
#[derive(Debug, Default)]
pub(crate) struct RecordingDelegate {
    pub(crate) widths: Vec<f64>,
    pub(crate) controls: Vec<usize>,
    pub(crate) missing_view: Option<usize>,
    pub(crate) views_requested: usize,
    pub(crate) tapped: Vec<(RowId, usize)>,
    pub(crate) began: Vec<RowId>,
    pub(crate) ended: Vec<RowId>,
}

impl RecordingDelegate {
    pub(crate) fn new(widths: &[f64]) -> Self {
        Self {
            widths: widths.to_vec(),
            controls: vec![0; widths.len()],
            ..Self::default()
        }
    }

    pub(crate) fn with_controls(mut self, index: usize, controls: usize) -> Self {
        self.controls[index] = controls;
        self
    }
}

impl SwipeRowDelegate for RecordingDelegate {
    type View = TestView;

    fn item_count(&self, _row: RowId) -> usize {
        self.widths.len()
    }

    fn item_width(&self, _row: RowId, index: usize) -> f64 {
        self.widths[index]
    }

    fn item_view(&mut self, _row: RowId, index: usize) -> Option<TestView> {
        self.views_requested += 1;
        if self.missing_view == Some(index) {
            return None;
        }
        Some(TestView {
            index,
            controls: self.controls[index],
        })
    }

    fn item_tapped(&mut self, row: RowId, index: usize) {
        self.tapped.push((row, index));
    }

    fn did_begin_editing(&mut self, row: RowId) {
        self.began.push(row);
    }

    fn did_end_editing(&mut self, row: RowId) {
        self.ended.push(row);
    }
}
