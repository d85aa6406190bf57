pub mod auth;
pub mod overlay;
pub mod search;
pub mod shared;
