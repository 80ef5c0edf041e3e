//! Builder for creating RawDetection objects from various input formats.

use crate::catalog::ClassCatalog;
use crate::decoder::{NormalizedBox, RawDetection};

/// Builder for creating `RawDetection` objects from various input formats.
///
/// Useful for feeding detections from a model other than a YOLO head
/// straight into the stabilizer.
#[derive(Debug, Clone, Default)]
pub struct RawDetectionBuilder {
    bbox: NormalizedBox,
    class_id: usize,
    label: String,
    confidence: f32,
}

impl RawDetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the box from normalized corners (x1, y1, x2, y2).
    pub fn corners(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = NormalizedBox::from_corners(x1, y1, x2, y2);
        self
    }

    /// Set the box from normalized center and size.
    pub fn center_size(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = NormalizedBox::new(cx, cy, w, h);
        self
    }

    /// Set the box from center, width and height in pixels of a square
    /// model input of side `input_size`.
    pub fn pixel_xywh(mut self, cx: f32, cy: f32, w: f32, h: f32, input_size: f32) -> Self {
        self.bbox = NormalizedBox::from_pixel_xywh(cx, cy, w, h, input_size);
        self
    }

    /// Set the class id and label explicitly.
    pub fn class(mut self, class_id: usize, label: impl Into<String>) -> Self {
        self.class_id = class_id;
        self.label = label.into();
        self
    }

    /// Set the class id, taking the label from `catalog`.
    pub fn class_from(mut self, class_id: usize, catalog: &ClassCatalog) -> Self {
        self.class_id = class_id;
        self.label = catalog.label(class_id).to_string();
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Build the final `RawDetection`.
    pub fn build(self) -> RawDetection {
        RawDetection::new(self.bbox, self.class_id, self.confidence, self.label)
    }
}
