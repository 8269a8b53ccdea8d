use std::path::{Path, PathBuf};

/// Texture loading failure. Never fatal: the renderer keeps its placeholder.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture `{}`", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture `{}` has zero size", path.display())]
    Empty { path: PathBuf },
}

/// Decoded texture pixels, tightly packed RGBA8 rows (top row first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureImage {
    /// Wraps raw RGBA8 pixels. Returns `None` when the size is zero or
    /// `rgba.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (expected > 0 && rgba.len() == expected).then_some(Self { width, height, rgba })
    }

    /// Reads and decodes an image file (format sniffed from its contents).
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(path, &bytes)
    }

    /// Decodes in-memory image bytes; `path` is only used for error reporting.
    pub fn decode(path: &Path, bytes: &[u8]) -> Result<Self, TextureError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let (width, height) = decoded.dimensions();
        Self::from_rgba(width, height, decoded.into_raw())
            .ok_or_else(|| TextureError::Empty { path: path.to_path_buf() })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}
