pub mod input_slot;
pub mod presenter;
pub mod response_decoder;
pub mod result_writer;

pub use input_slot::{InputSlot, SlotIndex};
pub use presenter::{LogPresenter, Presenter};
pub use response_decoder::{decode_failure_message, decode_image, DecodedImage, FALLBACK_MESSAGE};
pub use result_writer::ResultWriter;
