use std::path::Path;

use super::constants::IMAGE_EXTENSIONS;

/// True when the path's extension names a still-image format.
/// Case-insensitive; paths without an extension are treated as video.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bg.png", true)]
    #[case("bg.JPG", true)]
    #[case("/tmp/shots/plate.webp", true)]
    #[case("clip.mp4", false)]
    #[case("clip.avi", false)]
    #[case("no_extension", false)]
    fn test_is_image_path(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_image_path(Path::new(path)), expected);
    }
}
