mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputAction, KeyRepeat};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{Frame, GLYPH_ADVANCE_PX, LINE_ADVANCE_PX, PALETTE_LEN};
pub use scene::{InputSnapshot, Layer, LayerStacks, StackCommand};
