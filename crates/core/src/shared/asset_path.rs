use crate::shared::constants::{PUBLIC_FILES_PREFIX, STORAGE_MOUNT_PREFIX};

/// Rewrite a stored photo path into its public URL.
///
/// Stored paths carry the archive mount prefix (`/mnt/qnap_photos/...`);
/// the backend serves the same files under `/files/`. Paths without the
/// mount prefix are still rooted under `/files/` so relative and foreign
/// paths resolve against the API host rather than the local filesystem.
pub fn public_asset_url(api_base: &str, stored_path: &str) -> String {
    let relative = stored_path
        .strip_prefix(STORAGE_MOUNT_PREFIX)
        .unwrap_or_else(|| stored_path.trim_start_matches('/'));
    format!(
        "{}{}{}",
        api_base.trim_end_matches('/'),
        PUBLIC_FILES_PREFIX,
        relative
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:8000";

    #[test]
    fn test_strips_mount_prefix() {
        assert_eq!(
            public_asset_url(BASE, "/mnt/qnap_photos/crops/2024/face_01.jpg"),
            "http://127.0.0.1:8000/files/crops/2024/face_01.jpg"
        );
    }

    #[test]
    fn test_foreign_absolute_path_still_served() {
        assert_eq!(
            public_asset_url(BASE, "/archive/other/photo.png"),
            "http://127.0.0.1:8000/files/archive/other/photo.png"
        );
    }

    #[test]
    fn test_relative_path_untouched() {
        assert_eq!(
            public_asset_url(BASE, "crops/face.jpg"),
            "http://127.0.0.1:8000/files/crops/face.jpg"
        );
    }

    #[test]
    fn test_trailing_slash_on_base_collapses() {
        assert_eq!(
            public_asset_url("http://host/", "/mnt/qnap_photos/a.jpg"),
            "http://host/files/a.jpg"
        );
    }
}
