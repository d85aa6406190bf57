pub mod asset_path;
pub mod bounding_box;
pub mod constants;
