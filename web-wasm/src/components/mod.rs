//! UIコンポーネント

pub mod auth_gate;
pub mod header;
pub mod image_upload;
pub mod nutrition_results;
pub mod preview_carousel;
pub mod results_card;
pub mod webhook_results;
