//! Dense float-map container for model outputs (attention maps, raw
//! segmentation maps).
//!
//! On-disk `.fmap` layout is little-endian: 8-byte magic, u32 version,
//! u32 width, u32 height, then width*height f32 values in row-major order.
//! A `.fmap.gz` variant is accepted for gateways that compress their dumps,
//! and any other extension is decoded as a grayscale raster (intensity/255).

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use image::{GrayImage, ImageBuffer, Luma, imageops};
use memmap2::Mmap;

use crate::error::AnalysisError;

pub const MAGIC: [u8; 8] = *b"NSYMFMAP";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatMapHeaderV1 {
    pub version: u32,
    pub width: u32,
    pub height: u32,
}

impl FloatMapHeaderV1 {
    pub fn expected_len(&self) -> usize {
        HEADER_SIZE + self.width as usize * self.height as usize * 4
    }
}

pub fn write_header<W: Write>(mut w: W, header: &FloatMapHeaderV1) -> Result<()> {
    w.write_all(&MAGIC)?;
    w.write_all(&header.version.to_le_bytes())?;
    w.write_all(&header.width.to_le_bytes())?;
    w.write_all(&header.height.to_le_bytes())?;
    Ok(())
}

pub fn read_header<R: Read>(mut r: R) -> Result<FloatMapHeaderV1> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic).context("failed to read fmap magic")?;
    if magic != MAGIC {
        bail!("fmap magic mismatch");
    }
    let version = read_u32(&mut r)?;
    if version != VERSION {
        bail!("unsupported fmap version {}", version);
    }
    let width = read_u32(&mut r)?;
    let height = read_u32(&mut r)?;
    if width == 0 || height == 0 {
        bail!("fmap has zero dimension {}x{}", width, height);
    }
    Ok(FloatMapHeaderV1 {
        version,
        width,
        height,
    })
}

fn read_u32<R: Read>(mut r: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).context("failed to read u32")?;
    Ok(u32::from_le_bytes(buf))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FloatMap {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("float map has zero dimension {}x{}", width, height);
        }
        if data.len() != width as usize * height as usize {
            bail!(
                "float map data length mismatch: expected {}, got {}",
                width as usize * height as usize,
                data.len()
            );
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn from_gray(img: &GrayImage) -> Self {
        let data = img.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();
        Self {
            width: img.width(),
            height: img.height(),
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Rescale to the full byte range using the observed min/max. A flat map
    /// has no usable contrast and collapses to all-zero.
    pub fn to_normalized_bytes(&self) -> GrayImage {
        let min = self.min();
        let max = self.max();
        if !(max > min) {
            return GrayImage::new(self.width, self.height);
        }
        let span = max - min;
        GrayImage::from_fn(self.width, self.height, |x, y| {
            let v = (self.get(x, y) - min) / span;
            Luma([(v * 255.0).round().clamp(0.0, 255.0) as u8])
        })
    }

    /// Rescale values into [0,1]: byte-range maps are divided by 255, unit
    /// maps pass through clamped.
    pub fn to_unit_range(&self) -> FloatMap {
        let scale = if self.max() > 1.0 { 1.0 / 255.0 } else { 1.0 };
        let data = self
            .data
            .iter()
            .map(|v| (v * scale).clamp(0.0, 1.0))
            .collect();
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Bilinear resample onto a new grid.
    pub fn resized(&self, width: u32, height: u32) -> FloatMap {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let buf: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(self.width, self.height, self.data.clone())
                .expect("float map dimensions verified at construction");
        let resized = imageops::resize(&buf, width, height, imageops::FilterType::Triangle);
        Self {
            width,
            height,
            data: resized.into_raw(),
        }
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        let header = FloatMapHeaderV1 {
            version: VERSION,
            width: self.width,
            height: self.height,
        };
        write_header(&mut w, &header)?;
        for v in &self.data {
            w.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        self.write_to(&mut w)?;
        w.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Fmap,
    FmapGz,
    Raster,
}

impl MapFormat {
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("fmap") => Self::Fmap,
            Some("gz") => Self::FmapGz,
            _ => Self::Raster,
        }
    }
}

/// Load a float map from any of the accepted on-disk forms.
pub fn load(path: &Path) -> Result<FloatMap> {
    match MapFormat::detect(path) {
        MapFormat::Fmap => read_fmap_mmap(path),
        MapFormat::FmapGz => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            let mut decoder = GzDecoder::new(file);
            read_fmap_stream(&mut decoder)
                .with_context(|| format!("failed to read {}", path.display()))
        }
        MapFormat::Raster => {
            let img = image::open(path)
                .map_err(|e| AnalysisError::InputDecode {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
                .to_luma8();
            Ok(FloatMap::from_gray(&img))
        }
    }
}

fn read_fmap_mmap(path: &Path) -> Result<FloatMap> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mmap = unsafe {
        Mmap::map(&file).with_context(|| format!("failed to mmap {}", path.display()))?
    };
    if mmap.len() < HEADER_SIZE {
        bail!("{} too small for fmap header", path.display());
    }
    let header = read_header(&mmap[..HEADER_SIZE])?;
    let expected = header.expected_len();
    if mmap.len() != expected {
        bail!(
            "{} size mismatch: expected {}, got {}",
            path.display(),
            expected,
            mmap.len()
        );
    }
    let data = mmap[HEADER_SIZE..]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    FloatMap::new(header.width, header.height, data)
}

fn read_fmap_stream<R: Read>(mut r: R) -> Result<FloatMap> {
    let mut header_buf = [0u8; HEADER_SIZE];
    r.read_exact(&mut header_buf)
        .context("failed to read fmap header")?;
    let header = read_header(&header_buf[..])?;
    let mut body = Vec::new();
    r.read_to_end(&mut body).context("failed to read fmap body")?;
    if body.len() != header.expected_len() - HEADER_SIZE {
        bail!(
            "fmap size mismatch: expected {} value bytes, got {}",
            header.expected_len() - HEADER_SIZE,
            body.len()
        );
    }
    let data = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    FloatMap::new(header.width, header.height, data)
}
