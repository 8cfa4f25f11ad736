//! Image format detection from file extensions.
//!
//! The set of recognised formats is fixed at build time. Detection only ever
//! looks at the (case-insensitive) extension of a path, never at file
//! contents:
//!
//! - [`ImageFormat::from_path`] maps a path to its format, if any.
//! - [`is_image`] is the yes/no shorthand used when filtering a tree walk.
//! - [`ImageFormat`] also parses from extension or format names via
//!   [`FromStr`](std::str::FromStr).

mod construct;
pub mod error;

use derive_more::Display;
use std::path::Path;

/// A recognised image format.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// JPEG (.jpg, .jpeg)
    #[display("jpg")]
    Jpeg,
    /// Portable Network Graphics (.png)
    #[display("png")]
    Png,
    /// Graphics Interchange Format (.gif)
    #[display("gif")]
    Gif,
    /// Windows bitmap (.bmp)
    #[display("bmp")]
    Bmp,
    /// WebP (.webp)
    #[display("webp")]
    Webp,
    /// Tagged Image File Format (.tiff, .tif)
    #[display("tiff")]
    Tiff,
    /// High Efficiency Image File Format (.heic)
    #[display("heic")]
    Heic,
}

impl ImageFormat {
    /// Every recognised format.
    pub const ALL: [ImageFormat; 7] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Webp,
        ImageFormat::Tiff,
        ImageFormat::Heic,
    ];

    /// File extensions (lower-case, without the dot) that map to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Bmp => &["bmp"],
            ImageFormat::Webp => &["webp"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::Heic => &["heic"],
        }
    }
}

/// Returns `true` if the path has a recognised image extension.
#[must_use]
pub fn is_image(path: impl AsRef<Path>) -> bool {
    ImageFormat::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use crate::ImageFormat;

    #[test]
    fn every_extension_round_trips_to_its_format() {
        for format in ImageFormat::ALL {
            for ext in format.extensions() {
                assert_eq!(ext.parse::<ImageFormat>().unwrap(), format);
            }
        }
    }

    #[test]
    fn display_is_canonical_extension() {
        assert_eq!(ImageFormat::Jpeg.to_string(), "jpg");
        assert_eq!(ImageFormat::Tiff.to_string(), "tiff");
    }
}
