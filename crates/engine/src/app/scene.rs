use std::collections::VecDeque;

use tracing::debug;

use super::input::{ActionStates, InputAction};
use super::rendering::Frame;

/// Per-tick view of the input device: held states for the fixed action set
/// plus single-tick pressed edges for the keys menus care about.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    confirm_pressed: bool,
    pause_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates, confirm_pressed: bool, pause_pressed: bool) -> Self {
        Self {
            actions,
            confirm_pressed,
            pause_pressed,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.confirm_pressed
    }

    pub fn pause_pressed(&self) -> bool {
        self.pause_pressed
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_confirm_pressed(mut self, pressed: bool) -> Self {
        self.confirm_pressed = pressed;
        self
    }

    pub fn with_pause_pressed(mut self, pressed: bool) -> Self {
        self.pause_pressed = pressed;
        self
    }
}

/// Transition effect produced by a layer update or entry. Commands are
/// applied in order; a push runs the new layer's `enter` and queues whatever
/// that returns.
pub enum StackCommand<C> {
    PushScene(Box<dyn Layer<C>>),
    PopScene,
    ReplaceScene(Box<dyn Layer<C>>),
    PushMenu(Box<dyn Layer<C>>),
    PopMenu,
    Quit,
}

/// One entry on either stack: a persistent scene or a transient overlay
/// menu. The context type `C` carries whatever shared state the game keeps
/// outside the stacks (feature set, level bank).
pub trait Layer<C> {
    fn name(&self) -> &'static str;

    /// Runs once when the layer is pushed; may queue follow-up transitions
    /// (a level pushing its forced sacrifice menu, for example).
    fn enter(&mut self, _ctx: &mut C) -> Vec<StackCommand<C>> {
        Vec::new()
    }

    fn update(&mut self, input: &InputSnapshot, ctx: &mut C) -> Vec<StackCommand<C>>;

    fn draw(&self, frame: &mut Frame, ctx: &C);
}

/// Two independent LIFO stacks. The top menu, if any, takes input; otherwise
/// the top scene does. Drawing walks scenes bottom-up, then menus bottom-up.
pub struct LayerStacks<C> {
    scenes: Vec<Box<dyn Layer<C>>>,
    menus: Vec<Box<dyn Layer<C>>>,
}

impl<C> LayerStacks<C> {
    pub fn new(root_scene: Box<dyn Layer<C>>, ctx: &mut C) -> Self {
        let mut stacks = Self {
            scenes: Vec::new(),
            menus: Vec::new(),
        };
        stacks.apply(vec![StackCommand::PushScene(root_scene)], ctx);
        stacks
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty() && self.menus.is_empty()
    }

    pub fn active_layer_name(&self) -> Option<&'static str> {
        self.menus
            .last()
            .or_else(|| self.scenes.last())
            .map(|layer| layer.name())
    }

    /// Advances the single active layer by one tick. Returns `true` when the
    /// application should terminate (explicit quit or both stacks drained).
    pub fn update(&mut self, input: &InputSnapshot, ctx: &mut C) -> bool {
        let commands = if let Some(menu) = self.menus.last_mut() {
            menu.update(input, ctx)
        } else if let Some(scene) = self.scenes.last_mut() {
            scene.update(input, ctx)
        } else {
            return true;
        };
        self.apply(commands, ctx)
    }

    pub fn draw(&self, frame: &mut Frame, ctx: &C) {
        for scene in &self.scenes {
            scene.draw(frame, ctx);
        }
        for menu in &self.menus {
            menu.draw(frame, ctx);
        }
    }

    fn apply(&mut self, commands: Vec<StackCommand<C>>, ctx: &mut C) -> bool {
        let mut queue: VecDeque<StackCommand<C>> = commands.into();
        while let Some(command) = queue.pop_front() {
            match command {
                StackCommand::PushScene(mut scene) => {
                    debug!(layer = scene.name(), "scene_pushed");
                    queue.extend(scene.enter(ctx));
                    self.scenes.push(scene);
                }
                StackCommand::PopScene => {
                    if let Some(scene) = self.scenes.pop() {
                        debug!(layer = scene.name(), "scene_popped");
                    }
                }
                StackCommand::ReplaceScene(mut scene) => {
                    if let Some(old) = self.scenes.pop() {
                        debug!(layer = old.name(), "scene_popped");
                    }
                    debug!(layer = scene.name(), "scene_pushed");
                    queue.extend(scene.enter(ctx));
                    self.scenes.push(scene);
                }
                StackCommand::PushMenu(mut menu) => {
                    debug!(layer = menu.name(), "menu_pushed");
                    queue.extend(menu.enter(ctx));
                    self.menus.push(menu);
                }
                StackCommand::PopMenu => {
                    if let Some(menu) = self.menus.pop() {
                        debug!(layer = menu.name(), "menu_popped");
                    }
                }
                // Draining both stacks keeps quits issued during `enter`
                // terminal even though `new` discards the return value.
                StackCommand::Quit => {
                    self.scenes.clear();
                    self.menus.clear();
                    return true;
                }
            }
        }
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counters {
        scene_updates: u32,
        menu_updates: u32,
    }

    struct CountingScene {
        commands_on_update: Option<fn() -> Vec<StackCommand<Counters>>>,
    }

    impl Layer<Counters> for CountingScene {
        fn name(&self) -> &'static str {
            "counting_scene"
        }

        fn update(
            &mut self,
            _input: &InputSnapshot,
            ctx: &mut Counters,
        ) -> Vec<StackCommand<Counters>> {
            ctx.scene_updates += 1;
            self.commands_on_update.take().map(|f| f()).unwrap_or_default()
        }

        fn draw(&self, _frame: &mut Frame, _ctx: &Counters) {}
    }

    struct CountingMenu;

    impl Layer<Counters> for CountingMenu {
        fn name(&self) -> &'static str {
            "counting_menu"
        }

        fn update(
            &mut self,
            _input: &InputSnapshot,
            ctx: &mut Counters,
        ) -> Vec<StackCommand<Counters>> {
            ctx.menu_updates += 1;
            vec![StackCommand::PopMenu]
        }

        fn draw(&self, _frame: &mut Frame, _ctx: &Counters) {}
    }

    struct MenuPushingScene;

    impl Layer<Counters> for MenuPushingScene {
        fn name(&self) -> &'static str {
            "menu_pushing_scene"
        }

        fn enter(&mut self, _ctx: &mut Counters) -> Vec<StackCommand<Counters>> {
            vec![StackCommand::PushMenu(Box::new(CountingMenu))]
        }

        fn update(
            &mut self,
            _input: &InputSnapshot,
            ctx: &mut Counters,
        ) -> Vec<StackCommand<Counters>> {
            ctx.scene_updates += 1;
            Vec::new()
        }

        fn draw(&self, _frame: &mut Frame, _ctx: &Counters) {}
    }

    fn plain_scene() -> Box<dyn Layer<Counters>> {
        Box::new(CountingScene {
            commands_on_update: None,
        })
    }

    #[test]
    fn top_menu_takes_input_precedence_over_scenes() {
        let mut ctx = Counters::default();
        let mut stacks = LayerStacks::new(plain_scene(), &mut ctx);
        stacks.apply(vec![StackCommand::PushMenu(Box::new(CountingMenu))], &mut ctx);

        stacks.update(&InputSnapshot::empty(), &mut ctx);
        assert_eq!(ctx.menu_updates, 1);
        assert_eq!(ctx.scene_updates, 0);

        // The menu popped itself, so the scene receives the next tick.
        stacks.update(&InputSnapshot::empty(), &mut ctx);
        assert_eq!(ctx.scene_updates, 1);
    }

    #[test]
    fn enter_commands_of_a_pushed_scene_are_applied() {
        let mut ctx = Counters::default();
        let stacks = LayerStacks::new(Box::new(MenuPushingScene), &mut ctx);
        assert_eq!(stacks.scene_count(), 1);
        assert_eq!(stacks.menu_count(), 1);
        assert_eq!(stacks.active_layer_name(), Some("counting_menu"));
    }

    #[test]
    fn replace_scene_swaps_without_growing_the_stack() {
        let mut ctx = Counters::default();
        let mut stacks = LayerStacks::new(plain_scene(), &mut ctx);
        stacks.apply(
            vec![StackCommand::ReplaceScene(Box::new(MenuPushingScene))],
            &mut ctx,
        );
        assert_eq!(stacks.scene_count(), 1);
        assert_eq!(stacks.active_layer_name(), Some("counting_menu"));
    }

    #[test]
    fn quit_command_terminates_regardless_of_stack_state() {
        let mut ctx = Counters::default();
        let mut stacks = LayerStacks::new(
            Box::new(CountingScene {
                commands_on_update: Some(|| vec![StackCommand::Quit]),
            }),
            &mut ctx,
        );
        assert!(stacks.update(&InputSnapshot::empty(), &mut ctx));
    }

    #[test]
    fn draining_both_stacks_is_terminal() {
        let mut ctx = Counters::default();
        let mut stacks = LayerStacks::new(
            Box::new(CountingScene {
                commands_on_update: Some(|| vec![StackCommand::PopScene]),
            }),
            &mut ctx,
        );
        assert!(stacks.update(&InputSnapshot::empty(), &mut ctx));
        assert!(stacks.is_empty());
    }
}
