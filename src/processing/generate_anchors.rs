use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use ndarray::{array, concatenate, Array1, Array2, Axis};

#[derive(Debug, Clone)]
pub struct Config {
    pub rpn_anchor_cfg: HashMap<String, AnchorConfig>,
}

/// Per-stride anchor configuration for an RPN head.
#[derive(Debug, Clone)]
pub struct AnchorConfig {
    pub base_size: i32,
    pub ratios: Vec<f32>,
    pub scales: Vec<f32>,
    pub allowed_border: i32,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            base_size: 16,
            ratios: vec![0.5, 1.0, 2.0],
            scales: vec![8.0, 16.0, 32.0],
            allowed_border: 0,
        }
    }
}

/// Width, height and center of a box in inclusive-pixel coordinates,
/// where width = x2 - x1 + 1.
fn whctrs(anchor: &Array1<f32>) -> (f32, f32, f32, f32) {
    let w = anchor[2] - anchor[0] + 1.0;
    let h = anchor[3] - anchor[1] + 1.0;
    let x_ctr = anchor[0] + 0.5 * (w - 1.0);
    let y_ctr = anchor[1] + 0.5 * (h - 1.0);
    (w, h, x_ctr, y_ctr)
}

/// One box row per (width, height) pair, all centered on (x_ctr, y_ctr).
fn mkanchors(ws: &Array1<f32>, hs: &Array1<f32>, x_ctr: f32, y_ctr: f32) -> Array2<f32> {
    Array2::from_shape_fn((ws.len(), 4), |(i, j)| match j {
        0 => x_ctr - 0.5 * (ws[i] - 1.0),
        1 => y_ctr - 0.5 * (hs[i] - 1.0),
        2 => x_ctr + 0.5 * (ws[i] - 1.0),
        3 => y_ctr + 0.5 * (hs[i] - 1.0),
        _ => unreachable!(),
    })
}

/// Reshape an anchor to each aspect ratio, preserving its area and center.
/// Widths and heights are rounded to whole pixels.
fn ratio_enum(anchor: &Array1<f32>, ratios: &Array1<f32>) -> Array2<f32> {
    let (w, h, x_ctr, y_ctr) = whctrs(anchor);
    let size = w * h;
    let ws = ratios.mapv(|r| (size / r).sqrt().round());
    let hs = (&ws * ratios).mapv(f32::round);
    mkanchors(&ws, &hs, x_ctr, y_ctr)
}

/// Grow an anchor by each scale factor around its fixed center. No rounding.
fn scale_enum(anchor: &Array1<f32>, scales: &Array1<f32>) -> Array2<f32> {
    let (w, h, x_ctr, y_ctr) = whctrs(anchor);
    let ws = scales.mapv(|s| w * s);
    let hs = scales.mapv(|s| h * s);
    mkanchors(&ws, &hs, x_ctr, y_ctr)
}

/// Generate the reference anchor table by enumerating aspect ratios X scales
/// against a (0, 0, base_size - 1, base_size - 1) window.
///
/// The output has `ratios.len() * scales.len()` rows of (x1, y1, x2, y2) in
/// ratio-major, scale-minor order, every row centered on the base window.
/// Defaults of the RPN lineage: base_size 16, ratios [0.5, 1, 2],
/// scales [8, 16, 32].
pub fn generate_anchors(
    base_size: usize,
    ratios: &Array1<f32>,
    scales: &Array1<f32>,
) -> Result<Array2<f32>> {
    if ratios.is_empty() {
        bail!("ratios must be non-empty");
    }
    if scales.is_empty() {
        bail!("scales must be non-empty");
    }

    let base_anchor = array![1.0, 1.0, base_size as f32, base_size as f32] - 1.0;
    let ratio_anchors = ratio_enum(&base_anchor, ratios);

    let groups = ratio_anchors
        .axis_iter(Axis(0))
        .map(|anchor| scale_enum(&anchor.to_owned(), scales))
        .collect::<Vec<_>>();
    let views = groups.iter().map(|g| g.view()).collect::<Vec<_>>();

    Ok(concatenate(Axis(0), &views)?)
}

/// Same table as [`generate_anchors`]; with `dense_anchor` set, a copy of the
/// table shifted by stride / 2 in both axes is appended, doubling the rows.
pub fn generate_anchors_dense(
    base_size: usize,
    ratios: &Array1<f32>,
    scales: &Array1<f32>,
    stride: usize,
    dense_anchor: bool,
) -> Result<Array2<f32>> {
    let anchors = generate_anchors(base_size, ratios, scales)?;
    if !dense_anchor {
        return Ok(anchors);
    }
    if stride % 2 != 0 {
        bail!("dense anchors require an even stride, got {}", stride);
    }

    let shifted = &anchors + stride as f32 / 2.0;
    Ok(concatenate(Axis(0), &[anchors.view(), shifted.view()])?)
}

/// One anchor table per configured FPN stride, highest stride first.
pub fn generate_anchors_fpn(dense_anchor: bool, cfg: &Config) -> Result<Vec<Array2<f32>>> {
    let mut strides = Vec::with_capacity(cfg.rpn_anchor_cfg.len());
    for key in cfg.rpn_anchor_cfg.keys() {
        let stride: i32 = key
            .parse()
            .with_context(|| format!("anchor config stride key {:?} is not an integer", key))?;
        strides.push(stride);
    }
    strides.sort_unstable_by(|a, b| b.cmp(a));

    let mut anchors = Vec::with_capacity(strides.len());
    for stride in strides {
        let v = &cfg.rpn_anchor_cfg[&stride.to_string()];
        let ratios = Array1::from(v.ratios.clone());
        let scales = Array1::from(v.scales.clone());
        anchors.push(generate_anchors_dense(
            v.base_size as usize,
            &ratios,
            &scales,
            stride as usize,
            dense_anchor,
        )?);
    }

    Ok(anchors)
}
