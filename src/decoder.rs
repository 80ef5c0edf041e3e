//! Decoding of raw detection-head tensors into [`RawDetection`]s.
//!
//! Four output layouts are accepted, with `C = 4 + num_classes` channels
//! (box `x, y, w, h` in model pixels followed by one score per class) and
//! `N` detection slots: `[1, C, N]`, `[1, N, C]`, `[C, N]` and `[N, C]`.

mod bbox;
mod detection;
mod layout;
mod yolo;

pub use bbox::NormalizedBox;
pub use detection::RawDetection;
pub use layout::{BOX_CHANNELS, TensorLayout};
pub use yolo::{DecoderConfig, YoloDecoder};
