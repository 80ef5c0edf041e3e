use anchortrack_rs::{ClassCatalog, DecoderConfig, YoloDecoder};
use approx::assert_relative_eq;
use ndarray::{Array2, ArrayD};

const NUM_CLASSES: usize = 80;
const CHANNELS: usize = 4 + NUM_CLASSES;

fn decoder() -> YoloDecoder {
    YoloDecoder::new(DecoderConfig::default(), ClassCatalog::coco()).unwrap()
}

/// `[C, N]` logical data with a few populated slots.
fn logical() -> Array2<f32> {
    let mut t = Array2::zeros((CHANNELS, 10));
    // slot 3: centered box, class 6
    t[[0, 3]] = 320.0;
    t[[1, 3]] = 320.0;
    t[[2, 3]] = 100.0;
    t[[3, 3]] = 100.0;
    t[[4 + 6, 3]] = 0.9;
    // slot 7: border box, class 41 and 56 tied
    t[[0, 7]] = 10.0;
    t[[1, 7]] = 630.0;
    t[[2, 7]] = 40.0;
    t[[3, 7]] = 40.0;
    t[[4 + 41, 7]] = 0.5;
    t[[4 + 56, 7]] = 0.5;
    // slot 8: below threshold
    t[[4 + 2, 8]] = 0.2;
    t
}

#[test]
fn test_end_to_end_single_detection() {
    let mut t = Array2::<f32>::zeros((CHANNELS, 10));
    t[[0, 3]] = 320.0;
    t[[1, 3]] = 320.0;
    t[[2, 3]] = 100.0;
    t[[3, 3]] = 100.0;
    t[[4 + 6, 3]] = 0.9;
    let tensor = t.insert_axis(ndarray::Axis(0)).into_dyn();
    assert_eq!(tensor.shape(), &[1, 84, 10]);

    let dets = decoder().decode_with_threshold(tensor.view(), 0.25);
    assert_eq!(dets.len(), 1);
    let det = &dets[0];
    assert_relative_eq!(det.center().0, 0.5, epsilon = 1e-6);
    assert_relative_eq!(det.center().1, 0.5, epsilon = 1e-6);
    assert_relative_eq!(det.size().0, 0.156, epsilon = 1e-3);
    assert_relative_eq!(det.size().1, 0.156, epsilon = 1e-3);
    assert_eq!(det.class_id, 6);
    assert_eq!(det.label, "train");
    assert_relative_eq!(det.confidence, 0.9);
}

#[test]
fn test_layout_invariance() {
    let cn = logical();
    let layouts: Vec<ArrayD<f32>> = vec![
        cn.clone().insert_axis(ndarray::Axis(0)).into_dyn(),
        cn.t().to_owned().insert_axis(ndarray::Axis(0)).into_dyn(),
        cn.clone().into_dyn(),
        cn.t().to_owned().into_dyn(),
    ];

    let d = decoder();
    let expected = d.decode(layouts[0].view());
    assert_eq!(expected.len(), 2);
    for tensor in &layouts[1..] {
        assert_eq!(d.decode(tensor.view()), expected, "shape {:?}", tensor.shape());
    }
}

#[test]
fn test_tie_break_and_unclamped_box() {
    let dets = decoder().decode(logical().view().into_dyn());
    let border = dets.iter().find(|d| d.class_id != 6).unwrap();
    assert_eq!(border.class_id, 41);
    assert_eq!(border.label, "cup");

    let [x1, _, _, y2] = border.bbox.to_corners();
    assert!(x1 < 0.0);
    assert!(y2 > 1.0);
}

#[test]
fn test_threshold_boundary() {
    let d = decoder();
    let t = logical();
    assert_eq!(d.decode_with_threshold(t.view().into_dyn(), 0.2).len(), 3);
    assert_eq!(d.decode_with_threshold(t.view().into_dyn(), 0.21).len(), 2);
}

#[test]
fn test_malformed_tensors_yield_nothing() {
    let d = decoder();
    for shape in [vec![84], vec![1, 1, 84, 10], vec![1, 83, 10], vec![10, 85]] {
        let tensor = ArrayD::<f32>::ones(shape);
        assert!(d.decode(tensor.view()).is_empty());
    }
}
