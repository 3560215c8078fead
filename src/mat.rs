//! Mat — dense 2-D numeric array with interleaved channels.
//!
//! Layout: row-major, each element is `channels` consecutive values.
//! Values are held as f64 regardless of `depth`; the depth only drives the
//! on-disk type code (OpenCV `dt`) and how values are printed.

use anyhow::{anyhow, Result};
use serde::Serialize;

/// Element type, mirrors the OpenCV depths a pipeline typically dumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Depth {
    U8,
    I8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl Depth {
    /// OpenCV FileStorage type character.
    pub fn code(self) -> char {
        match self {
            Depth::U8 => 'u',
            Depth::I8 => 'c',
            Depth::U16 => 'w',
            Depth::I16 => 's',
            Depth::I32 => 'i',
            Depth::F32 => 'f',
            Depth::F64 => 'd',
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        !matches!(self, Depth::F32 | Depth::F64)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mat {
    rows: usize,
    cols: usize,
    channels: usize,
    depth: Depth,
    data: Vec<f64>,
}

impl Mat {
    /// Zero-filled matrix. `channels` is clamped to at least 1.
    pub fn zeros(rows: usize, cols: usize, channels: usize, depth: Depth) -> Self {
        let channels = channels.max(1);
        Self {
            rows,
            cols,
            channels,
            depth,
            data: vec![0.0; rows * cols * channels],
        }
    }

    /// Build from interleaved row-major values; length must match the shape.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        channels: usize,
        depth: Depth,
        data: Vec<f64>,
    ) -> Result<Self> {
        let channels = channels.max(1);
        let expected = rows * cols * channels;
        if data.len() != expected {
            return Err(anyhow!(
                "Mat::from_vec: expected {} values for {}x{}x{}, got {}",
                expected,
                rows,
                cols,
                channels,
                data.len()
            ));
        }
        Ok(Self {
            rows,
            cols,
            channels,
            depth,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// (rows, cols, channels)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    /// Total number of scalar values (rows * cols * channels).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn offset(&self, row: usize, col: usize, ch: usize) -> Option<usize> {
        if row < self.rows && col < self.cols && ch < self.channels {
            Some((row * self.cols + col) * self.channels + ch)
        } else {
            None
        }
    }

    pub fn at(&self, row: usize, col: usize, ch: usize) -> Option<f64> {
        self.offset(row, col, ch).map(|i| self.data[i])
    }

    pub fn at_mut(&mut self, row: usize, col: usize, ch: usize) -> Option<&mut f64> {
        let i = self.offset(row, col, ch)?;
        Some(&mut self.data[i])
    }

    /// Set one value; out-of-range coordinates are an error.
    pub fn set(&mut self, row: usize, col: usize, ch: usize, value: f64) -> Result<()> {
        let (rows, cols, channels) = self.shape();
        let slot = self.at_mut(row, col, ch).ok_or_else(|| {
            anyhow!(
                "Mat::set: ({}, {}, {}) out of range for {}x{}x{}",
                row,
                col,
                ch,
                rows,
                cols,
                channels
            )
        })?;
        *slot = value;
        Ok(())
    }

    /// Same values viewed as a single-channel matrix with `cols * channels` columns.
    pub fn reshape_single_channel(&self) -> Mat {
        Mat {
            rows: self.rows,
            cols: self.cols * self.channels,
            channels: 1,
            depth: self.depth,
            data: self.data.clone(),
        }
    }

    /// OpenCV type string: "f" for one channel, "3f" for three, etc.
    pub fn dt(&self) -> String {
        if self.channels == 1 {
            self.depth.code().to_string()
        } else {
            format!("{}{}", self.channels, self.depth.code())
        }
    }

    /// Render one value the way the codecs print it.
    pub fn format_value(&self, v: f64) -> String {
        if self.depth.is_integer() {
            format!("{}", v.round() as i64)
        } else {
            // Display для f64 даёт кратчайшее точное представление ("1", "0.5", "1e-7").
            let s = format!("{v}");
            if s.contains(['.', 'e', 'E', 'N', 'i']) {
                s
            } else {
                format!("{s}.")
            }
        }
    }
}
