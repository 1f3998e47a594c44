pub mod layout;
pub mod morph;
pub mod spiral;
