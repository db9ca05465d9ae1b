//! File storage implementations

mod photos;

pub use photos::{LocalPhotoStore, ALLOWED_PHOTO_EXTENSIONS, DEFAULT_MAX_PHOTO_BYTES};
