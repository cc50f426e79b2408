//! Render-ready chart shapes.
//!
//! An [`AnnotationSet`] is an ordered list: renderers draw it front to back, so
//! later entries end up on top of earlier ones.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::style::{Layer, LineStyle};

/// What a shape stands for, so a renderer can build legends or toggle groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationRole {
    Consolidation,
    BodyHigh,
    BodyLow,
    RangeHigh,
    RangeLow,
    Entry,
    Risk,
    Reward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalLine {
    pub role: AnnotationRole,
    pub x0: DateTime<FixedOffset>,
    pub x1: DateTime<FixedOffset>,
    pub y: f64,
    pub line: LineStyle,
}

/// Axis-aligned box. `y0`/`y1` keep the order they were given in, they are not sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub role: AnnotationRole,
    pub x0: DateTime<FixedOffset>,
    pub x1: DateTime<FixedOffset>,
    pub y0: f64,
    pub y1: f64,
    pub fill_color: String,
    pub opacity: f64,
    pub layer: Layer,
    pub border: LineStyle,
}

impl Rectangle {
    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).abs()
    }

    pub fn is_degenerate(&self) -> bool {
        self.y0 == self.y1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub role: AnnotationRole,
    pub x: DateTime<FixedOffset>,
    pub y: f64,
    pub color: String,
    pub size: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    HorizontalLine(HorizontalLine),
    Rectangle(Rectangle),
    PointMarker(PointMarker),
}

impl Annotation {
    pub fn role(&self) -> AnnotationRole {
        match self {
            Annotation::HorizontalLine(line) => line.role,
            Annotation::Rectangle(rect) => rect.role,
            Annotation::PointMarker(marker) => marker.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    shapes: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.shapes.push(annotation);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.shapes.iter()
    }

    /// First shape with the given role, if any.
    pub fn find(&self, role: AnnotationRole) -> Option<&Annotation> {
        self.shapes.iter().find(|shape| shape.role() == role)
    }

    pub fn rectangle(&self, role: AnnotationRole) -> Option<&Rectangle> {
        match self.find(role)? {
            Annotation::Rectangle(rect) => Some(rect),
            _ => None,
        }
    }

    pub fn line(&self, role: AnnotationRole) -> Option<&HorizontalLine> {
        match self.find(role)? {
            Annotation::HorizontalLine(line) => Some(line),
            _ => None,
        }
    }

    pub fn marker(&self) -> Option<&PointMarker> {
        self.shapes.iter().find_map(|shape| match shape {
            Annotation::PointMarker(marker) => Some(marker),
            _ => None,
        })
    }
}
