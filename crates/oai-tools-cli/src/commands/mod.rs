pub mod check_response;
pub mod filter_date;
pub mod filter_meta;
pub mod image_text;
pub mod thread_demo;
