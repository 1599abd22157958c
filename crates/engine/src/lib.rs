pub mod app;
mod grid;
mod kinematics;

pub use app::{
    run_app, AppError, Frame, InputAction, InputSnapshot, KeyRepeat, Layer, LayerStacks,
    LoopConfig, LoopMetricsSnapshot, StackCommand, GLYPH_ADVANCE_PX, LINE_ADVANCE_PX, PALETTE_LEN,
};
pub use grid::{TileGrid, TileGridError, TileRect, TILE_SIZE_PX};
pub use kinematics::{
    step_horizontal, step_vertical, Body, HorizontalContact, Vec2, VerticalContact,
};
