use engine::{Frame, InputSnapshot, Layer, StackCommand, LINE_ADVANCE_PX};
use tracing::info;

use crate::app::features::Feature;
use crate::app::state::GameState;
use crate::app::text::TextSequence;

use super::{draw_centered_line, kill_switch};

const ENDING_PAGE_TICKS: u32 = 240;

/// Scripted closing scene. Which variant plays depends on whether the
/// tutorial survived the run; both quit once the last page is dismissed.
pub(crate) struct EndingScene {
    scene_name: &'static str,
    sequence: TextSequence,
}

impl EndingScene {
    pub(crate) fn credits() -> Self {
        Self::scripted(
            "credits_sequence",
            &[
                "YOU KEPT THE TUTORIAL ALIVE.",
                "EVERY DOOR TOOK ITS PRICE,",
                "BUT SOMEONE STILL EXPLAINS.",
                "THANK YOU FOR PLAYING.",
            ],
        )
    }

    pub(crate) fn endgame() -> Self {
        Self::scripted(
            "endgame_sequence",
            &["THE LAST DOOR CLOSES.", "NOTHING IS LEFT TO EXPLAIN."],
        )
    }

    fn scripted(scene_name: &'static str, pages: &[&str]) -> Self {
        Self {
            scene_name,
            sequence: TextSequence::new(
                pages.iter().map(ToString::to_string).collect(),
                ENDING_PAGE_TICKS,
            ),
        }
    }
}

impl Layer<GameState> for EndingScene {
    fn name(&self) -> &'static str {
        self.scene_name
    }

    fn enter(&mut self, _ctx: &mut GameState) -> Vec<StackCommand<GameState>> {
        info!(scene = self.scene_name, "scene_loaded");
        Vec::new()
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        ctx: &mut GameState,
    ) -> Vec<StackCommand<GameState>> {
        if let Some(commands) = kill_switch(ctx) {
            return commands;
        }
        self.sequence.tick(input.confirm_pressed());
        if self.sequence.is_finished() {
            info!(reason = self.scene_name, "shutdown_requested");
            return vec![StackCommand::Quit];
        }
        Vec::new()
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameState) {
        if !ctx.features.is_enabled(Feature::Rendering) {
            return;
        }
        if let Some(page) = self.sequence.current_page() {
            draw_centered_line(frame, 56, page, 7);
            draw_centered_line(frame, 56 + 2 * LINE_ADVANCE_PX, "(Z)", 6);
        }
    }
}
