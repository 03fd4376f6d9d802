// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codec — decodes input files to RGBA and encodes final output, with
// the format inferred from the file extension.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use redact_core::{RedactError, Result};
use tracing::{debug, info, instrument};

pub struct ImageCodec {
    writable: Vec<ImageFormat>,
}

impl ImageCodec {
    /// Probe the formats this build can encode.
    pub fn new() -> Result<Self> {
        let writable: Vec<ImageFormat> = ImageFormat::all()
            .filter(|format| format.writing_enabled())
            .collect();
        if writable.is_empty() {
            return Err(RedactError::ServiceInit(
                "no image encoders compiled in".into(),
            ));
        }
        debug!(formats = ?writable, "image codec ready");
        Ok(Self { writable })
    }

    pub fn can_write(&self, format: ImageFormat) -> bool {
        self.writable.contains(&format)
    }

    /// Decode an image file to straight RGBA.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(&self, path: impl AsRef<Path>) -> Result<RgbaImage> {
        let image = image::open(path.as_ref()).map_err(|err| {
            RedactError::Image(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = image.width(), height = image.height(), "image loaded");
        Ok(image.into_rgba8())
    }

    /// Encode `pixels` to `path`. Formats without an alpha channel (JPEG)
    /// get the colour channels only.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), width = pixels.width(), height = pixels.height()))]
    pub fn save(&self, pixels: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|err| {
            RedactError::Image(format!("cannot infer format of {}: {}", path.display(), err))
        })?;
        if !self.can_write(format) {
            return Err(RedactError::Image(format!(
                "{format:?} output is not supported"
            )));
        }

        let result = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(pixels.clone())
                .to_rgb8()
                .save_with_format(path, format),
            _ => pixels.save_with_format(path, format),
        };
        result.map_err(|err| {
            RedactError::Image(format!("failed to save image to {}: {}", path.display(), err))
        })?;
        info!("image saved");
        Ok(())
    }
}
