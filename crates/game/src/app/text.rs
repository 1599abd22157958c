/// Timed-advance iterator over scripted dialogue pages. A page advances on
/// confirm or when its timer runs out; after the last page the sequence
/// reports itself finished.
pub(crate) struct TextSequence {
    pages: Vec<String>,
    current: usize,
    ticks_on_page: u32,
    ticks_per_page: u32,
}

impl TextSequence {
    pub(crate) fn new(pages: Vec<String>, ticks_per_page: u32) -> Self {
        Self {
            pages,
            current: 0,
            ticks_on_page: 0,
            ticks_per_page: ticks_per_page.max(1),
        }
    }

    pub(crate) fn current_page(&self) -> Option<&str> {
        self.pages.get(self.current).map(String::as_str)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.current >= self.pages.len()
    }

    pub(crate) fn tick(&mut self, confirm_pressed: bool) {
        if self.is_finished() {
            return;
        }
        self.ticks_on_page += 1;
        if confirm_pressed || self.ticks_on_page >= self.ticks_per_page {
            self.current += 1;
            self.ticks_on_page = 0;
        }
    }
}
