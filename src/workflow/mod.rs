pub mod stitch_ctx;
pub mod stitch_flow;

pub use stitch_ctx::StitchCtx;
pub use stitch_flow::{Completion, StitchFlow, StitchOutcome};
