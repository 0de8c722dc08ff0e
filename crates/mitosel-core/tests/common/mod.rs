#![allow(dead_code)]

use std::ops::Range;

use ndarray::{s, Array2, Array4};

use mitosel_core::volume::Volume;

/// Axis-aligned bright block inside a 4D volume.
pub struct Block {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
    pub depth: Range<usize>,
    pub time: Range<usize>,
    pub value: f32,
}

/// Build a `(rows, cols, depth, time)` volume of zeros with bright blocks.
pub fn volume_with_blocks(shape: (usize, usize, usize, usize), blocks: &[Block]) -> Volume {
    let mut data = Array4::<f32>::zeros(shape);
    for b in blocks {
        data.slice_mut(s![
            b.rows.clone(),
            b.cols.clone(),
            b.depth.clone(),
            b.time.clone()
        ])
        .fill(b.value);
    }
    Volume::new(data, 1.0).expect("valid test volume")
}

/// 2D frame of `background` with a filled rectangle of `value`.
pub fn frame_with_rect(
    h: usize,
    w: usize,
    rows: Range<usize>,
    cols: Range<usize>,
    background: f32,
    value: f32,
) -> Array2<f32> {
    let mut frame = Array2::from_elem((h, w), background);
    frame.slice_mut(s![rows, cols]).fill(value);
    frame
}

/// Binary mask from a list of foreground pixels.
pub fn mask_from_pixels(h: usize, w: usize, pixels: &[(usize, usize)]) -> Array2<bool> {
    let mut mask = Array2::from_elem((h, w), false);
    for &(r, c) in pixels {
        mask[[r, c]] = true;
    }
    mask
}

/// Deterministic pseudo-random sequence in [0, 1) for reproducible fixtures.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}
