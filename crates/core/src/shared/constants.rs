/// Edge length of the square face-overlay thumbnails, in logical pixels.
pub const FACE_THUMB_EDGE: f32 = 100.0;

/// Ranked candidates requested per detected face.
pub const DEFAULT_TOP_K: u32 = 20;

/// Default minimum similarity percentage for a candidate to be returned.
pub const DEFAULT_THRESHOLD: u8 = 50;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Absolute mount prefix the archive workers stamp into stored photo paths.
pub const STORAGE_MOUNT_PREFIX: &str = "/mnt/qnap_photos/";

/// Public prefix the backend serves stored photos under.
pub const PUBLIC_FILES_PREFIX: &str = "/files/";
