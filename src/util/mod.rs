//! Utility modules

pub mod file_validation;
pub mod image;
pub mod text;

// Re-export file validation utilities
pub use file_validation::{
    filename_for_display, is_image_file, is_likely_binary, read_image_file, read_text_file,
    validate_file_for_opening, FileOpenError, MAX_FILE_SIZE,
};
