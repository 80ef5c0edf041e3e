/// Detection box in normalized image space.
///
/// Coordinates are fractions of the model input resolution and are never
/// clamped: boxes touching the border may extend below 0 or above 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedBox {
    /// Center x
    pub cx: f32,
    /// Center y
    pub cy: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl NormalizedBox {
    #[inline]
    pub fn new(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            cx,
            cy,
            width,
            height,
        }
    }

    /// Create a box from its corners (x1, y1, x2, y2).
    #[inline]
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            cx: (x1 + x2) / 2.0,
            cy: (y1 + y2) / 2.0,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert a center-format box in model pixels to normalized space.
    ///
    /// `input_size` is the side of the square model input.
    #[inline]
    pub fn from_pixel_xywh(x: f32, y: f32, w: f32, h: f32, input_size: f32) -> Self {
        let x1 = (x - w / 2.0) / input_size;
        let y1 = (y - h / 2.0) / input_size;
        let x2 = (x + w / 2.0) / input_size;
        let y2 = (y + h / 2.0) / input_size;
        Self::from_corners(x1, y1, x2, y2)
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.cx, self.cy)
    }

    #[inline]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Convert to corner format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_corners(&self) -> [f32; 4] {
        [
            self.cx - self.width / 2.0,
            self.cy - self.height / 2.0,
            self.cx + self.width / 2.0,
            self.cy + self.height / 2.0,
        ]
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
