mod font;
mod frame;
mod renderer;

pub use frame::{Frame, GLYPH_ADVANCE_PX, LINE_ADVANCE_PX, PALETTE_LEN};
pub(crate) use renderer::Renderer;
