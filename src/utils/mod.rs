pub mod extractor;
pub mod file_magic;
pub mod image;
pub mod jwt;
pub mod media;
pub mod parameter_error_handler;
pub mod password;
pub mod short_link;
pub mod validate;

pub use extractor::SafeIDI64;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
