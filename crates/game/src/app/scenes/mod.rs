mod endings;
mod level;
mod menus;

pub(crate) use endings::EndingScene;
pub(crate) use level::LevelScene;
pub(crate) use menus::{PauseMenu, SacrificeMenu, TutorialMenu};

use engine::{Frame, StackCommand};
use tracing::info;

use super::features::Feature;
use super::state::GameState;

/// Sacrificing `game` terminates the whole application on the next update,
/// whichever layer happens to be active.
fn kill_switch(ctx: &GameState) -> Option<Vec<StackCommand<GameState>>> {
    if ctx.features.is_enabled(Feature::Game) {
        return None;
    }
    info!(reason = "game_sacrificed", "shutdown_requested");
    Some(vec![StackCommand::Quit])
}

/// Menu chrome: a filled panel with a border, skipped entirely once the
/// `windows` feature is sacrificed (the text still draws on raw background).
fn draw_panel(frame: &mut Frame, x: i32, y: i32, width: i32, height: i32, ctx: &GameState) {
    if !ctx.features.is_enabled(Feature::Windows) {
        return;
    }
    frame.fill_rect(x, y, width, height, 1);
    frame.rect_outline(x, y, width, height, 7);
}

fn draw_centered_line(frame: &mut Frame, y: i32, text: &str, color: u8) {
    let x = (frame.width() as i32 - Frame::text_width(text)) / 2;
    frame.text(x, y, text, color);
}
