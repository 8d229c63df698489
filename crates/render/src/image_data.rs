use crate::backend::RenderError;
use image::DynamicImage;
use std::path::Path;

/// Decoded RGBA8 texture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Decode an image file.
    ///
    /// Rows are flipped so the first row is the bottom of the image, matching
    /// the bottom-left texture coordinates of [`crate::Mesh::textured_quad`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| RenderError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_dynamic(img);
        tracing::debug!(
            "decoded texture {} ({}x{})",
            path.display(),
            data.width,
            data.height
        );
        Ok(data)
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        let rgba = img.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }

    /// Bytes per row of tightly packed RGBA8.
    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}
