//! Pixel buffer regions
//!
//! The chain borrows a rectangular window of caller-owned interleaved float
//! pixel data for the duration of `apply`. It rewrites values in place and
//! never resizes, reallocates, or reformats the buffer.

use crate::{Error, Result};

/// Per-pixel storage format of a buffer region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Interleaved R, G, B, A in f32, nominally [0, 1]
    RgbaF32,
    /// Interleaved C, M, Y, K, A in f32, inks in [0, 1]
    CmykaF32,
}

impl PixelFormat {
    /// Number of interleaved channels per pixel
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::RgbaF32 => 4,
            PixelFormat::CmykaF32 => 5,
        }
    }

    /// Index of the alpha channel
    pub fn alpha_index(&self) -> usize {
        self.channels() - 1
    }

    /// Number of color (non-alpha) channels
    pub fn color_channels(&self) -> usize {
        self.channels() - 1
    }
}

/// A rectangle of pixels in absolute buffer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A mutable, borrowed view over a region of interleaved float pixels
///
/// `data` starts at the region's top-left pixel; consecutive rows are
/// `row_stride` f32 elements apart. The absolute origin `(region.x, region.y)`
/// is carried so coordinate-dependent kernels see buffer coordinates, not
/// view-local ones.
pub struct PixelRegion<'a> {
    data: &'a mut [f32],
    format: PixelFormat,
    region: Region,
    row_stride: usize,
}

impl<'a> PixelRegion<'a> {
    /// Create a view with an explicit row stride (in f32 elements)
    pub fn with_stride(
        data: &'a mut [f32],
        format: PixelFormat,
        region: Region,
        row_stride: usize,
    ) -> Result<Self> {
        let row_len = region.width as usize * format.channels();
        if row_stride < row_len {
            return Err(Error::Geometry(format!(
                "row stride {} shorter than row length {}",
                row_stride, row_len
            )));
        }
        let expected = if region.height == 0 {
            0
        } else {
            (region.height as usize - 1) * row_stride + row_len
        };
        if data.len() < expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            format,
            region,
            row_stride,
        })
    }

    /// Create a tightly packed view (stride == width × channels)
    pub fn interleaved(data: &'a mut [f32], format: PixelFormat, region: Region) -> Result<Self> {
        let row_stride = region.width as usize * format.channels();
        Self::with_stride(data, format, region, row_stride)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Iterate rows top to bottom as `(absolute_y, row_pixels)`
    ///
    /// Each row slice is exactly `width × channels` long.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (u32, &mut [f32])> {
        let row_len = self.region.width as usize * self.format.channels();
        let y0 = self.region.y;
        self.data
            .chunks_mut(self.row_stride.max(1))
            .take(self.region.height as usize)
            .enumerate()
            .map(move |(i, chunk)| (y0 + i as u32, &mut chunk[..row_len]))
    }

    /// Parallel row iterator, same item shape as [`rows_mut`](Self::rows_mut)
    #[cfg(feature = "parallel")]
    pub fn par_rows_mut(
        &mut self,
    ) -> impl rayon::iter::IndexedParallelIterator<Item = (u32, &mut [f32])> {
        use rayon::prelude::*;
        let row_len = self.region.width as usize * self.format.channels();
        let y0 = self.region.y;
        self.data
            .par_chunks_mut(self.row_stride.max(1))
            .take(self.region.height as usize)
            .enumerate()
            .map(move |(i, chunk)| (y0 + i as u32, &mut chunk[..row_len]))
    }
}

/// View a packed RGBA row as pixel quads
///
/// The row length must be a multiple of four.
pub fn rgba_pixels_mut(row: &mut [f32]) -> &mut [[f32; 4]] {
    bytemuck::cast_slice_mut(row)
}

/// Run `f` once per row; rows are partitioned across threads when the
/// `parallel` feature is enabled. `f` must not depend on execution order.
pub(crate) fn for_each_row<F>(region: &mut PixelRegion<'_>, f: F)
where
    F: Fn(u32, &mut [f32]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        region.par_rows_mut().for_each(|(y, row)| f(y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in region.rows_mut() {
            f(y, row);
        }
    }
}
