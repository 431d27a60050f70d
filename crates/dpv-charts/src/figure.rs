//! Explicit ordered figure registry.
//!
//! Replaces the plotting engine notion of "currently open figures": figures
//! are plain values held in a [`FigureBook`], and numeric handles exist only
//! as stable names for the export step.

use std::path::Path;

use serde::{Deserialize, Serialize};

use dpv_core::DpvError;

use crate::comparison::{ComparisonChart, COMPARISON_SIZE};
use crate::dashboard::{DashboardChart, DASHBOARD_SIZE};

/// Numeric identifier naming a figure within a [`FigureBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FigureHandle(u32);

impl FigureHandle {
    /// Creates a handle from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the handle.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

/// Renderable figure content.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureSpec {
    /// Best-versus-worst comparison figure.
    Comparison(ComparisonChart),
    /// Four-panel analysis dashboard.
    Dashboard(DashboardChart),
}

impl FigureSpec {
    /// Pixel dimensions the figure renders at.
    pub fn size(&self) -> (u32, u32) {
        match self {
            FigureSpec::Comparison(_) => COMPARISON_SIZE,
            FigureSpec::Dashboard(_) => DASHBOARD_SIZE,
        }
    }

    /// Renders the figure as a PNG at `path`.
    pub fn render(&self, path: &Path) -> Result<(), DpvError> {
        match self {
            FigureSpec::Comparison(chart) => chart.render(path),
            FigureSpec::Dashboard(chart) => chart.render(path),
        }
    }
}

/// A figure together with its handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    handle: FigureHandle,
    spec: FigureSpec,
}

impl Figure {
    /// Handle naming this figure.
    pub fn handle(&self) -> FigureHandle {
        self.handle
    }

    /// Renderable content of this figure.
    pub fn spec(&self) -> &FigureSpec {
        &self.spec
    }
}

/// Ordered collection of figures awaiting export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureBook {
    figures: Vec<Figure>,
}

impl FigureBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of figures in the book.
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// Whether the book holds no figures.
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Figures in insertion order.
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// Handles in insertion order.
    pub fn handles(&self) -> Vec<FigureHandle> {
        self.figures.iter().map(Figure::handle).collect()
    }

    /// Appends a figure, assigning the next free handle (starting at 1).
    pub fn push(&mut self, spec: FigureSpec) -> FigureHandle {
        let next = self
            .figures
            .iter()
            .map(|figure| figure.handle.as_raw())
            .max()
            .unwrap_or(0)
            + 1;
        let handle = FigureHandle::from_raw(next);
        self.figures.push(Figure { handle, spec });
        handle
    }

    /// Appends a figure under an explicit handle.
    pub fn push_with_handle(&mut self, handle: FigureHandle, spec: FigureSpec) {
        self.figures.push(Figure { handle, spec });
    }
}
