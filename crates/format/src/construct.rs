use crate::ImageFormat;
use crate::error::{Error, ErrorKind};
use std::{path::Path, str::FromStr};

impl FromStr for ImageFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            "bmp" | "bitmap" => Ok(ImageFormat::Bmp),
            "webp" => Ok(ImageFormat::Webp),
            "tif" | "tiff" => Ok(ImageFormat::Tiff),
            "heic" => Ok(ImageFormat::Heic),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}
impl ImageFormat {
    /// Detect the image format from a file extension.
    ///
    /// Returns `None` when the path has no extension, the extension is not
    /// valid UTF-8, or it isn't one of the recognised image extensions.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        ImageFormat::ALL.into_iter().find(|format| format.extensions().contains(&ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{ImageFormat, is_image};
    use rstest::rstest;

    #[rstest]
    #[case("jpg", ImageFormat::Jpeg)]
    #[case("JPEG", ImageFormat::Jpeg)]
    #[case("png", ImageFormat::Png)]
    #[case("Gif", ImageFormat::Gif)]
    #[case("bitmap", ImageFormat::Bmp)]
    #[case("webp", ImageFormat::Webp)]
    #[case("tif", ImageFormat::Tiff)]
    #[case("TIFF", ImageFormat::Tiff)]
    #[case("heic", ImageFormat::Heic)]
    fn test_from_str(#[case] test: &str, #[case] expected: ImageFormat) {
        assert_eq!(test.parse::<ImageFormat>().unwrap(), expected);
    }

    #[rstest]
    #[case("txt")]
    #[case("raw")]
    #[case("")]
    #[case(" jpg")]
    fn test_from_str_invalid(#[case] test: &str) {
        assert!(test.parse::<ImageFormat>().is_err());
    }

    #[rstest]
    #[case("photo.jpg", Some(ImageFormat::Jpeg))]
    #[case("PHOTO.JPG", Some(ImageFormat::Jpeg))]
    #[case("holiday/beach.Jpeg", Some(ImageFormat::Jpeg))]
    #[case("scan.tif", Some(ImageFormat::Tiff))]
    #[case("scan.TIFF", Some(ImageFormat::Tiff))]
    #[case("phone/IMG_0001.HEIC", Some(ImageFormat::Heic))]
    #[case("icon.bmp", Some(ImageFormat::Bmp))]
    #[case("anim.gif", Some(ImageFormat::Gif))]
    #[case("sticker.webp", Some(ImageFormat::Webp))]
    #[case("notes.txt", None)]
    #[case("archive.jpg.zip", None)]
    #[case("no_extension", None)]
    // `.jpg` is a dotfile with no extension (like `.bashrc`).
    #[case(".jpg", None)]
    #[case("trailing.", None)]
    fn test_from_path(#[case] test: &str, #[case] expected: Option<ImageFormat>) {
        assert_eq!(ImageFormat::from_path(test), expected);
        assert_eq!(is_image(test), expected.is_some());
    }

    #[test]
    fn test_case_insensitive_classification() {
        assert_eq!(ImageFormat::from_path("PHOTO.JPG"), ImageFormat::from_path("photo.jpg"));
    }
}
