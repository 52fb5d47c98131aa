use std::path::Path;

use anyhow::Result;
use image::{GrayImage, RgbImage};

use crate::error::AnalysisError;

pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).map_err(|e| AnalysisError::InputDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(img.to_rgb8())
}

pub fn load_gray(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|e| AnalysisError::InputDecode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(img.to_luma8())
}
