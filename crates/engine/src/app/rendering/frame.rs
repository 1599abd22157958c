use super::font;

pub const PALETTE_LEN: usize = 16;

/// Fixed 16-entry retro palette (RGBA). All drawing selects colors by index.
pub(crate) const PALETTE: [[u8; 4]; PALETTE_LEN] = [
    [0x00, 0x00, 0x00, 0xff],
    [0x1d, 0x2b, 0x53, 0xff],
    [0x7e, 0x25, 0x53, 0xff],
    [0x00, 0x87, 0x51, 0xff],
    [0xab, 0x52, 0x36, 0xff],
    [0x5f, 0x57, 0x4f, 0xff],
    [0xc2, 0xc3, 0xc7, 0xff],
    [0xff, 0xf1, 0xe8, 0xff],
    [0xff, 0x00, 0x4d, 0xff],
    [0xff, 0xa3, 0x00, 0xff],
    [0xff, 0xec, 0x27, 0xff],
    [0x00, 0xe4, 0x36, 0xff],
    [0x29, 0xad, 0xff, 0xff],
    [0x83, 0x76, 0x9c, 0xff],
    [0xff, 0x77, 0xa8, 0xff],
    [0xff, 0xcc, 0xaa, 0xff],
];

/// Horizontal advance of one glyph, including spacing.
pub const GLYPH_ADVANCE_PX: i32 = font::GLYPH_WIDTH + 1;
/// Vertical advance of one text line, including spacing.
pub const LINE_ADVANCE_PX: i32 = font::GLYPH_HEIGHT + 2;

/// Software canvas of palette indices at the game's logical resolution.
/// The renderer maps it through [`PALETTE`] when presenting.
pub struct Frame {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl Frame {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            indices: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn clear(&mut self, color: u8) {
        self.indices.fill(color % PALETTE_LEN as u8);
    }

    pub fn set_px(&mut self, x: i32, y: i32, color: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.indices[y as usize * self.width as usize + x as usize] = color % PALETTE_LEN as u8;
    }

    pub fn px_at(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.indices[y as usize * self.width as usize + x as usize])
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: u8) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = (x + rect_width).min(self.width as i32);
        let end_y = (y + rect_height).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.set_px(px, py, color);
            }
        }
    }

    pub fn rect_outline(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: u8) {
        if rect_width <= 1 || rect_height <= 1 {
            return;
        }
        self.fill_rect(x, y, rect_width, 1, color);
        self.fill_rect(x, y + rect_height - 1, rect_width, 1, color);
        self.fill_rect(x, y, 1, rect_height, color);
        self.fill_rect(x + rect_width - 1, y, 1, rect_height, color);
    }

    pub fn text(&mut self, mut x: i32, y: i32, text: &str, color: u8) {
        for ch in text.chars() {
            let rows = font::glyph(ch);
            for (row_index, &row_bits) in rows.iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if row_bits as i32 & (1 << (font::GLYPH_WIDTH - 1 - col)) != 0 {
                        self.set_px(x + col, y + row_index as i32, color);
                    }
                }
            }
            x += GLYPH_ADVANCE_PX;
        }
    }

    /// Pixel width of a rendered string, used for centering menu lines.
    pub fn text_width(text: &str) -> i32 {
        text.chars().count() as i32 * GLYPH_ADVANCE_PX
    }
}
