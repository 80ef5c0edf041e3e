//! YOLO detection-head decoding.

use std::collections::HashSet;

use log::{trace, warn};
use ndarray::{ArrayView1, ArrayViewD, s};

use crate::catalog::ClassCatalog;
use crate::decoder::bbox::NormalizedBox;
use crate::decoder::detection::RawDetection;
use crate::decoder::layout::{BOX_CHANNELS, TensorLayout};
use crate::error::{Error, Result};

/// Configuration for the [`YoloDecoder`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Minimum best-class score for a slot to be emitted (inclusive).
    pub confidence_threshold: f32,
    /// Number of class score channels after the four box channels.
    pub num_classes: usize,
    /// Side of the square model input, in pixels.
    pub input_size: f32,
    /// When set, only these class ids are emitted.
    pub class_filter: Option<Vec<usize>>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            num_classes: 80,
            input_size: 640.0,
            class_filter: None,
        }
    }
}

impl DecoderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.num_classes == 0 {
            return Err(Error::InvalidConfig(
                "num_classes must be at least 1".to_string(),
            ));
        }
        if !(self.input_size.is_finite() && self.input_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "input_size must be positive, got {}",
                self.input_size
            )));
        }
        Ok(())
    }
}

/// Stateless decoder turning one output tensor into [`RawDetection`]s.
#[derive(Debug, Clone)]
pub struct YoloDecoder {
    config: DecoderConfig,
    catalog: ClassCatalog,
    allowed: Option<HashSet<usize>>,
}

impl YoloDecoder {
    pub fn new(config: DecoderConfig, catalog: ClassCatalog) -> Result<Self> {
        config.validate()?;
        let allowed = config
            .class_filter
            .as_ref()
            .map(|ids| ids.iter().copied().collect());
        Ok(Self {
            config,
            catalog,
            allowed,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Decode with the configured confidence threshold.
    pub fn decode(&self, tensor: ArrayViewD<'_, f32>) -> Vec<RawDetection> {
        self.decode_with_threshold(tensor, self.config.confidence_threshold)
    }

    /// Decode every slot whose best class score is at least
    /// `confidence_threshold`.
    ///
    /// Unsupported shapes and thresholds outside `[0, 1]` yield an empty
    /// result and a warning.
    pub fn decode_with_threshold(
        &self,
        tensor: ArrayViewD<'_, f32>,
        confidence_threshold: f32,
    ) -> Vec<RawDetection> {
        if !(0.0..=1.0).contains(&confidence_threshold) {
            warn!(
                "Dropping output tensor: confidence threshold {confidence_threshold} not in [0, 1]"
            );
            return Vec::new();
        }
        let num_classes = self.config.num_classes;
        let layout = match TensorLayout::detect(tensor.shape(), num_classes) {
            Ok(layout) => layout,
            Err(e) => {
                warn!("Dropping output tensor: {e}");
                return Vec::new();
            }
        };
        let Some(view) = layout.channel_view(tensor) else {
            warn!("Dropping output tensor: layout {layout:?} does not fit its rank");
            return Vec::new();
        };

        let mut detections = Vec::new();
        for (slot, pred) in view.columns().into_iter().enumerate() {
            let bbox = pred.slice(s![0..BOX_CHANNELS]);
            let scores = pred.slice(s![BOX_CHANNELS..BOX_CHANNELS + num_classes]);

            let (class_id, confidence) = best_class(scores);
            if !confidence.is_finite() || confidence < confidence_threshold {
                continue;
            }
            if let Some(allowed) = &self.allowed {
                if !allowed.contains(&class_id) {
                    continue;
                }
            }

            let bbox = NormalizedBox::from_pixel_xywh(
                bbox[0],
                bbox[1],
                bbox[2],
                bbox[3],
                self.config.input_size,
            );
            trace!("Slot {slot}: class {class_id} score {confidence:.3} box {bbox:?}");
            detections.push(RawDetection::new(
                bbox,
                class_id,
                confidence,
                self.catalog.label(class_id),
            ));
        }
        detections
    }
}

/// Argmax over class scores. Ties keep the lowest index; NaN never wins.
fn best_class(scores: ArrayView1<'_, f32>) -> (usize, f32) {
    scores
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (id, &score)| {
            if score > best.1 { (id, score) } else { best }
        })
}
