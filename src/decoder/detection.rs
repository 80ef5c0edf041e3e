use crate::decoder::bbox::NormalizedBox;

/// One decoded detection, consumed within the cycle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Box in normalized image space
    pub bbox: NormalizedBox,
    /// Winning class index
    pub class_id: usize,
    /// Best per-class score
    pub confidence: f32,
    /// Catalog label for `class_id`
    pub label: String,
}

impl RawDetection {
    pub fn new(bbox: NormalizedBox, class_id: usize, confidence: f32, label: impl Into<String>) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
            label: label.into(),
        }
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        self.bbox.center()
    }

    #[inline]
    pub fn size(&self) -> (f32, f32) {
        self.bbox.size()
    }
}
