pub mod image_file;
pub mod loaders;
pub mod params;
pub mod state;

pub use image_file::{ImageFile, ACCEPTED_MEDIA_TYPES};
pub use loaders::{load_image_file, load_params};
pub use params::StitchParameters;
pub use state::{RequestState, ResourceView, SessionView, ViewStatus};
