pub mod image_loader;
pub mod toml_loader;

pub use image_loader::load_image_file;
pub use toml_loader::load_params;
