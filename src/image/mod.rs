//! Pixel buffer types shared by the pipeline stages.
//!
//! - [`RgbU8`] – borrowed view over a decoded color photo (the upstream
//!   contract: interleaved 8-bit RGB, row-major).
//! - [`RgbImage`] – owned interleaved RGB buffer produced by the rectifier.
//! - [`GrayImage`] – owned single-channel buffer used by segmentation and
//!   digit normalisation.
//!
//! All owned buffers are tightly packed (no stride); a buffer is immutable
//! once handed to the next stage.

pub mod io;
pub mod ops;

/// Borrowed view over an interleaved 8-bit RGB photo.
///
/// `data.len()` must be at least `w * h * 3`.
#[derive(Clone, Copy, Debug)]
pub struct RgbU8<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl<'a> RgbU8<'a> {
    /// Sample the RGB triple at (x, y).
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Owned interleaved 8-bit RGB buffer.
#[derive(Clone, Debug)]
pub struct RgbImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Construct a zero-initialised buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h * 3],
        }
    }

    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_rgb(&mut self, x: usize, y: usize, px: [u8; 3]) {
        let i = (y * self.w + x) * 3;
        self.data[i..i + 3].copy_from_slice(&px);
    }

    /// Borrow as a read-only photo view.
    pub fn as_view(&self) -> RgbU8<'_> {
        RgbU8 {
            w: self.w,
            h: self.h,
            data: &self.data,
        }
    }
}

/// Owned single-channel 8-bit buffer in row-major layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Construct a zero-initialised buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Wrap raw bytes; `data.len()` must equal `w * h`.
    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), w * h, "buffer size must match dimensions");
        Self { w, h, data }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }

    /// Crop a rectangular window into a new owned buffer.
    ///
    /// `x0 + cw <= w` and `y0 + ch <= h` must hold.
    pub fn crop(&self, x0: usize, y0: usize, cw: usize, ch: usize) -> GrayImage {
        assert!(x0 + cw <= self.w && y0 + ch <= self.h, "crop out of bounds");
        let mut out = GrayImage::new(cw, ch);
        for y in 0..ch {
            let src = &self.row(y0 + y)[x0..x0 + cw];
            let dst_start = y * cw;
            out.data[dst_start..dst_start + cw].copy_from_slice(src);
        }
        out
    }
}
