use engine::{
    Frame, InputAction, InputSnapshot, KeyRepeat, Layer, StackCommand, LINE_ADVANCE_PX,
};
use tracing::{debug, info};

use crate::app::features::Feature;
use crate::app::state::GameState;
use crate::app::text::TextSequence;

use super::level::LevelScene;
use super::{draw_centered_line, draw_panel, kill_switch};

// Menu navigation auto-repeat, in ticks.
const NAV_INITIAL_DELAY: u32 = 15;
const NAV_REPEAT_INTERVAL: u32 = 5;

/// Ticks a tutorial page stays up before auto-advancing.
const TUTORIAL_PAGE_TICKS: u32 = 300;

/// Forced on entry to every level after the first: pick one currently
/// enabled feature to give up. The menu pops once the sacrifice is recorded.
pub(crate) struct SacrificeMenu {
    level_index: usize,
    selection: usize,
    repeat_up: KeyRepeat,
    repeat_down: KeyRepeat,
}

impl SacrificeMenu {
    pub(crate) fn boxed(level_index: usize) -> Box<dyn Layer<GameState>> {
        Box::new(Self {
            level_index,
            selection: 0,
            repeat_up: KeyRepeat::new(NAV_INITIAL_DELAY, NAV_REPEAT_INTERVAL),
            repeat_down: KeyRepeat::new(NAV_INITIAL_DELAY, NAV_REPEAT_INTERVAL),
        })
    }
}

impl Layer<GameState> for SacrificeMenu {
    fn name(&self) -> &'static str {
        "sacrifice_menu"
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        ctx: &mut GameState,
    ) -> Vec<StackCommand<GameState>> {
        if let Some(commands) = kill_switch(ctx) {
            return commands;
        }

        let options = ctx.features.enabled_features();
        if options.is_empty() {
            return vec![StackCommand::PopMenu];
        }
        if self.selection >= options.len() {
            self.selection = options.len() - 1;
        }

        if self.repeat_up.tick(input.is_down(InputAction::Up)) && self.selection > 0 {
            self.selection -= 1;
        }
        if self.repeat_down.tick(input.is_down(InputAction::Down))
            && self.selection + 1 < options.len()
        {
            self.selection += 1;
        }

        if input.confirm_pressed() {
            ctx.features.disable(options[self.selection], self.level_index);
            return vec![StackCommand::PopMenu];
        }
        Vec::new()
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameState) {
        if !ctx.features.is_enabled(Feature::Rendering) {
            return;
        }
        draw_panel(frame, 6, 2, 116, 124, ctx);
        frame.text(12, 6, "SACRIFICE ONE:", 7);

        for (index, feature) in ctx.features.enabled_features().iter().enumerate() {
            let y = 16 + index as i32 * LINE_ADVANCE_PX;
            if index == self.selection {
                frame.text(12, y, ">", 10);
                frame.text(18, y, feature.label(), 10);
            } else {
                frame.text(18, y, feature.label(), 6);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PauseChoice {
    Resume,
    Restart,
    Previous,
    Quit,
}

impl PauseChoice {
    fn label(self) -> &'static str {
        match self {
            PauseChoice::Resume => "RESUME",
            PauseChoice::Restart => "RESTART LEVEL",
            PauseChoice::Previous => "PREVIOUS LEVEL",
            PauseChoice::Quit => "QUIT",
        }
    }
}

/// Opened by holding the pause key. Restarting gives one sacrifice back;
/// retreating gives back everything sacrificed on the level being left.
pub(crate) struct PauseMenu {
    level_index: usize,
    choices: Vec<PauseChoice>,
    selection: usize,
    repeat_up: KeyRepeat,
    repeat_down: KeyRepeat,
}

impl PauseMenu {
    pub(crate) fn boxed(level_index: usize) -> Box<dyn Layer<GameState>> {
        let mut choices = vec![PauseChoice::Resume, PauseChoice::Restart];
        if level_index > 0 {
            choices.push(PauseChoice::Previous);
        }
        choices.push(PauseChoice::Quit);
        Box::new(Self {
            level_index,
            choices,
            selection: 0,
            repeat_up: KeyRepeat::new(NAV_INITIAL_DELAY, NAV_REPEAT_INTERVAL),
            repeat_down: KeyRepeat::new(NAV_INITIAL_DELAY, NAV_REPEAT_INTERVAL),
        })
    }

    fn confirm(&self, ctx: &mut GameState) -> Vec<StackCommand<GameState>> {
        match self.choices[self.selection] {
            PauseChoice::Resume => vec![StackCommand::PopMenu],
            PauseChoice::Restart => {
                if ctx.features.restore_last().is_err() {
                    debug!(level = self.level_index, "no_sacrifice_to_restore");
                }
                vec![
                    StackCommand::PopMenu,
                    StackCommand::ReplaceScene(LevelScene::boxed(self.level_index)),
                ]
            }
            PauseChoice::Previous => {
                ctx.features.restore_for_level(self.level_index);
                vec![
                    StackCommand::PopMenu,
                    StackCommand::ReplaceScene(LevelScene::boxed(self.level_index - 1)),
                ]
            }
            PauseChoice::Quit => {
                info!(reason = "pause_menu", "shutdown_requested");
                vec![StackCommand::Quit]
            }
        }
    }
}

impl Layer<GameState> for PauseMenu {
    fn name(&self) -> &'static str {
        "pause_menu"
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        ctx: &mut GameState,
    ) -> Vec<StackCommand<GameState>> {
        if let Some(commands) = kill_switch(ctx) {
            return commands;
        }

        if input.pause_pressed() {
            return vec![StackCommand::PopMenu];
        }

        if self.repeat_up.tick(input.is_down(InputAction::Up)) && self.selection > 0 {
            self.selection -= 1;
        }
        if self.repeat_down.tick(input.is_down(InputAction::Down))
            && self.selection + 1 < self.choices.len()
        {
            self.selection += 1;
        }

        if input.confirm_pressed() {
            return self.confirm(ctx);
        }
        Vec::new()
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameState) {
        if !ctx.features.is_enabled(Feature::Rendering) {
            return;
        }
        let height = 20 + self.choices.len() as i32 * LINE_ADVANCE_PX;
        draw_panel(frame, 20, 36, 88, height, ctx);
        frame.text(26, 40, "PAUSED", 7);

        for (index, choice) in self.choices.iter().enumerate() {
            let y = 50 + index as i32 * LINE_ADVANCE_PX;
            if index == self.selection {
                frame.text(26, y, ">", 10);
                frame.text(32, y, choice.label(), 10);
            } else {
                frame.text(32, y, choice.label(), 6);
            }
        }
    }
}

/// Scripted help pages shown over the first level; pops itself when the
/// sequence runs out.
pub(crate) struct TutorialMenu {
    sequence: TextSequence,
}

impl TutorialMenu {
    pub(crate) fn boxed(pages: Vec<String>) -> Box<dyn Layer<GameState>> {
        Box::new(Self {
            sequence: TextSequence::new(pages, TUTORIAL_PAGE_TICKS),
        })
    }
}

impl Layer<GameState> for TutorialMenu {
    fn name(&self) -> &'static str {
        "tutorial_menu"
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
            return vec![StackCommand::PopMenu];
        }
        Vec::new()
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameState) {
        if !ctx.features.is_enabled(Feature::Rendering) {
            return;
        }
        let Some(page) = self.sequence.current_page() else {
            return;
        };
        draw_panel(frame, 2, 102, 124, 22, ctx);
        draw_centered_line(frame, 108, page, 7);
        draw_centered_line(frame, 116, "(Z)", 6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::scenes::test_support::{ledge_level, state_from_rows};
    use engine::LayerStacks;

    fn rows_ref(rows: &[String]) -> Vec<&str> {
        rows.iter().map(String::as_str).collect()
    }

    fn two_level_state() -> GameState {
        let level = ledge_level((10, 2));
        let level = rows_ref(&level);
        state_from_rows(&[&level, &level])
    }

    fn confirm() -> InputSnapshot {
        InputSnapshot::empty().with_confirm_pressed(true)
    }

    fn down_then_confirm(stacks: &mut LayerStacks<GameState>, ctx: &mut GameState, steps: usize) {
        for _ in 0..steps {
            let input = InputSnapshot::empty().with_action_down(InputAction::Down, true);
            stacks.update(&input, ctx);
            // Release between presses so each hold fires exactly one pulse.
            stacks.update(&InputSnapshot::empty(), ctx);
        }
        stacks.update(&confirm(), ctx);
    }

    #[test]
    fn sacrifice_menu_disables_the_selected_feature_and_pops() {
        let mut ctx = two_level_state();
        let mut stacks = LayerStacks::new(LevelScene::boxed(1), &mut ctx);
        assert_eq!(stacks.active_layer_name(), Some("sacrifice_menu"));

        // Second entry in listing order is `jump`.
        down_then_confirm(&mut stacks, &mut ctx, 1);

        assert!(!ctx.features.is_enabled(Feature::Jump));
        assert_eq!(stacks.menu_count(), 0);
        assert_eq!(ctx.features.sacrifice_count(), 1);
    }

    #[test]
    fn pause_restart_restores_one_sacrifice() {
        let mut ctx = two_level_state();
        ctx.features.disable(Feature::Friction, 1);
        let mut stacks = LayerStacks::new(LevelScene::boxed(1), &mut ctx);
        // Clear the forced sacrifice menu without sacrificing jump twice.
        down_then_confirm(&mut stacks, &mut ctx, 1);
        assert_eq!(ctx.features.sacrifice_count(), 2);

        let mut menu = PauseMenu::boxed(1);
        let mut nav = InputSnapshot::empty().with_action_down(InputAction::Down, true);
        menu.update(&nav, &mut ctx);
        nav = InputSnapshot::empty();
        menu.update(&nav, &mut ctx);
        let commands = menu.update(&confirm(), &mut ctx);

        // Restart restored the most recent sacrifice (jump).
        assert!(ctx.features.is_enabled(Feature::Jump));
        assert_eq!(ctx.features.sacrifice_count(), 1);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn pause_previous_restores_the_leaving_levels_sacrifices() {
        let mut ctx = two_level_state();
        ctx.features.disable(Feature::Gravity, 0);
        ctx.features.disable(Feature::Jump, 1);
        ctx.features.disable(Feature::Friction, 1);

        let mut menu = PauseMenu::boxed(1);
        // Resume, Restart, Previous.
        let down = InputSnapshot::empty().with_action_down(InputAction::Down, true);
        menu.update(&down, &mut ctx);
        menu.update(&InputSnapshot::empty(), &mut ctx);
        menu.update(&down, &mut ctx);
        menu.update(&InputSnapshot::empty(), &mut ctx);
        menu.update(&confirm(), &mut ctx);

        assert!(ctx.features.is_enabled(Feature::Jump));
        assert!(ctx.features.is_enabled(Feature::Friction));
        assert!(!ctx.features.is_enabled(Feature::Gravity));
    }

    #[test]
    fn pause_menu_on_level_zero_offers_no_previous() {
        let mut ctx = two_level_state();
        let mut menu = PauseMenu::boxed(0);
        // Navigate past the end; the third entry is already Quit.
        let down = InputSnapshot::empty().with_action_down(InputAction::Down, true);
        for _ in 0..8 {
            menu.update(&down, &mut ctx);
            menu.update(&InputSnapshot::empty(), &mut ctx);
        }
        let commands = menu.update(&confirm(), &mut ctx);
        assert!(matches!(commands.as_slice(), [StackCommand::Quit]));
    }

    #[test]
    fn pause_press_resumes_from_the_pause_menu() {
        let mut ctx = two_level_state();
        let mut menu = PauseMenu::boxed(1);
        let input = InputSnapshot::empty().with_pause_pressed(true);
        let commands = menu.update(&input, &mut ctx);
        assert!(matches!(commands.as_slice(), [StackCommand::PopMenu]));
    }

    #[test]
    fn tutorial_menu_pops_after_its_last_page() {
        let mut ctx = two_level_state();
        let mut menu = TutorialMenu::boxed(vec!["ONE".into(), "TWO".into()]);

        assert!(menu.update(&confirm(), &mut ctx).is_empty());
        let commands = menu.update(&confirm(), &mut ctx);
        assert!(matches!(commands.as_slice(), [StackCommand::PopMenu]));
    }
}
