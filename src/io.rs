pub mod compress;
pub mod source;
pub mod stream;
