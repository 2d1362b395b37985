use ndarray::{array, s, Array2, Array4};

/// Broadcast a base anchor table across a height x width feature-map grid.
///
/// Each grid cell gets every base anchor translated by
/// (iw * stride, ih * stride). Output shape is (height, width, A, 4) where
/// A is the number of base anchors.
pub fn anchors(
    height: usize,
    width: usize,
    stride: usize,
    base_anchors: &Array2<f32>,
) -> Array4<f32> {
    let a = base_anchors.nrows();
    let mut all_anchors = Array4::<f32>::zeros((height, width, a, 4));

    for ih in 0..height {
        let sh = (ih * stride) as f32;
        for iw in 0..width {
            let sw = (iw * stride) as f32;
            let shift = array![sw, sh, sw, sh];
            for (k, anchor) in base_anchors.outer_iter().enumerate() {
                all_anchors
                    .slice_mut(s![ih, iw, k, ..])
                    .assign(&(&anchor + &shift));
            }
        }
    }

    all_anchors
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use crate::rcnn::anchors::anchors;

    #[test]
    fn test_anchors() {
        let base_anchors = array![[0.0, 0.0, 15.0, 15.0], [0.0, 0.0, 31.0, 31.0]];

        let all_anchors = anchors(2, 2, 16, &base_anchors);
        assert_eq!(all_anchors.shape(), &[2, 2, 2, 4]);

        // origin cell keeps the base anchors
        assert_eq!(all_anchors[[0, 0, 0, 2]], 15.0);
        assert_eq!(all_anchors[[0, 0, 1, 2]], 31.0);

        // iw shifts x by stride
        assert_eq!(all_anchors[[0, 1, 0, 0]], 16.0);
        assert_eq!(all_anchors[[0, 1, 0, 1]], 0.0);
        assert_eq!(all_anchors[[0, 1, 0, 2]], 31.0);
        assert_eq!(all_anchors[[0, 1, 0, 3]], 15.0);

        // ih shifts y by stride
        assert_eq!(all_anchors[[1, 0, 1, 0]], 0.0);
        assert_eq!(all_anchors[[1, 0, 1, 1]], 16.0);
        assert_eq!(all_anchors[[1, 0, 1, 2]], 31.0);
        assert_eq!(all_anchors[[1, 0, 1, 3]], 47.0);
    }

    #[test]
    fn test_anchors_empty_grid() {
        let base_anchors = array![[0.0, 0.0, 15.0, 15.0]];
        let all_anchors = anchors(0, 0, 16, &base_anchors);
        assert_eq!(all_anchors.shape(), &[0, 0, 1, 4]);
    }
}
