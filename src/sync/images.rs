//! Image directory listing and image-to-pass attribution.

use std::path::Path;

use passsync_common::Result;

/// Reserved subdirectory holding generated thumbnails; never synced.
pub const THUMB_DIR: &str = "thumb";

/// List every entry name in the images directory, excluding the reserved
/// thumbnail entry.
///
/// The directory is flat; the listing is not partitioned by pass here, that
/// happens per pass via [`images_for_pass`].
pub async fn list_images(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != THUMB_DIR {
            names.push(name);
        }
    }

    Ok(names)
}

/// Select the images belonging to a pass by filename-prefix match.
///
/// Attribution is purely `starts_with` against the pass's `file_path`; if
/// one pass's prefix happens to be a prefix of another's, images are
/// attributed to both. Known and unguarded.
pub fn images_for_pass(images: &[String], file_path: &str) -> Vec<String> {
    images
        .iter()
        .filter(|image| image.starts_with(file_path))
        .cloned()
        .collect()
}

/// Content type for an image filename: `image/<extension>`.
pub fn content_type(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or_default();
    format!("image/{}", ext)
}
