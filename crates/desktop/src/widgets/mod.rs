pub mod drop_zone;
pub mod face_overlay_card;
pub mod match_card;
pub mod match_inspector;
pub mod text_result_row;
