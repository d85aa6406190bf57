use std::path::{Path, PathBuf};

use crate::search::domain::error::UploadError;
use crate::shared::constants::IMAGE_EXTENSIONS;

/// An admitted upload: the raw asset plus its natural pixel dimensions.
///
/// The desktop layer pairs this with a renderer preview handle; the handle
/// is released when a new upload replaces it or the view tears down.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedImage {
    pub path: PathBuf,
    pub natural_width: u32,
    pub natural_height: u32,
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Admit one image from a drop or picker selection.
///
/// Exactly one file per interaction: the first candidate with an accepted
/// image extension wins and the rest of a multi-file drop is ignored. The
/// MIME gate runs before any dimension probe or network activity.
pub fn select_upload(candidates: &[PathBuf]) -> Result<UploadedImage, UploadError> {
    let first = candidates.first().ok_or(UploadError::Empty)?;
    let path = candidates
        .iter()
        .find(|p| is_image(p))
        .ok_or_else(|| UploadError::NotAnImage(first.clone()))?;

    let (natural_width, natural_height) =
        image::image_dimensions(path).map_err(|source| UploadError::Unreadable {
            path: path.clone(),
            source,
        })?;

    Ok(UploadedImage {
        path: path.clone(),
        natural_width,
        natural_height,
    })
}
