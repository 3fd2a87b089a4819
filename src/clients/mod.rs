pub mod stitch_client;
pub mod stitch_service;

pub use stitch_client::HttpStitchClient;
pub use stitch_service::{StitchPayload, StitchReply, StitchService};
