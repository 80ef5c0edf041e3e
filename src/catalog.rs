//! Class id to label lookup.

/// Label returned for class ids the catalog does not cover.
pub const UNKNOWN_LABEL: &str = "unknown";

const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

/// Ordered, immutable list of class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    names: Vec<String>,
}

impl ClassCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The 80 COCO classes in YOLO training order.
    pub fn coco() -> Self {
        Self::new(COCO_CLASSES)
    }

    /// Label for `class_id`, or [`UNKNOWN_LABEL`] when out of range.
    pub fn label(&self, class_id: usize) -> &str {
        self.names
            .get(class_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// First class id carrying `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::coco()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coco_lookup() {
        let catalog = ClassCatalog::coco();
        assert_eq!(catalog.len(), 80);
        assert_eq!(catalog.label(0), "person");
        assert_eq!(catalog.label(6), "train");
        assert_eq!(catalog.label(79), "toothbrush");
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        let catalog = ClassCatalog::new(["cup", "chair"]);
        assert_eq!(catalog.label(2), UNKNOWN_LABEL);
        assert_eq!(catalog.label(usize::MAX), UNKNOWN_LABEL);
    }

    #[test]
    fn test_index_of() {
        let catalog = ClassCatalog::coco();
        assert_eq!(catalog.index_of("cup"), Some(41));
        assert_eq!(catalog.index_of("unicorn"), None);
    }
}
