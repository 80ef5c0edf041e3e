use ndarray::{ArrayView2, ArrayViewD, Axis, Ix2};

use crate::error::{Error, Result};

/// Number of box coordinates preceding the class scores in every slot.
pub const BOX_CHANNELS: usize = 4;

/// Axis order of a YOLO-style detection output tensor.
///
/// `C = 4 + num_classes` is the channel count and `N` the number of
/// detection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, C, N]` or `[C, N]`
    ChannelFirst { batched: bool },
    /// `[1, N, C]` or `[N, C]`
    DetectionFirst { batched: bool },
}

impl TensorLayout {
    /// Infer the layout from the tensor shape alone.
    ///
    /// The channel-first reading is tried first, so a square `[C, C]` tensor
    /// is treated as channel-first. Only the first batch entry is decoded.
    pub fn detect(shape: &[usize], num_classes: usize) -> Result<Self> {
        let channels = BOX_CHANNELS + num_classes;
        let (batched, rows, cols) = match *shape {
            [_, rows, cols] => (true, rows, cols),
            [rows, cols] => (false, rows, cols),
            _ => return Err(unsupported(shape, channels)),
        };

        if batched && shape[0] == 0 {
            return Err(unsupported(shape, channels));
        }

        if rows == channels {
            Ok(Self::ChannelFirst { batched })
        } else if cols == channels {
            Ok(Self::DetectionFirst { batched })
        } else {
            Err(unsupported(shape, channels))
        }
    }

    pub fn is_batched(&self) -> bool {
        match *self {
            Self::ChannelFirst { batched } | Self::DetectionFirst { batched } => batched,
        }
    }

    /// View the tensor as `[C, N]`: one column per detection slot.
    ///
    /// Detection-first tensors are transposed without copying. Returns
    /// `None` when the tensor rank does not match this layout.
    pub fn channel_view<'a>(&self, tensor: ArrayViewD<'a, f32>) -> Option<ArrayView2<'a, f32>> {
        let unbatched = if self.is_batched() {
            if tensor.ndim() != 3 || tensor.len_of(Axis(0)) == 0 {
                return None;
            }
            tensor.index_axis_move(Axis(0), 0)
        } else {
            tensor
        };
        let view = unbatched.into_dimensionality::<Ix2>().ok()?;

        Some(match self {
            Self::ChannelFirst { .. } => view,
            Self::DetectionFirst { .. } => view.reversed_axes(),
        })
    }
}

fn unsupported(shape: &[usize], channels: usize) -> Error {
    Error::UnsupportedShape {
        shape: shape.to_vec(),
        channels,
    }
}
