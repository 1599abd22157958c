#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Pause,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Up => 0,
            InputAction::Down => 1,
            InputAction::Left => 2,
            InputAction::Right => 3,
            InputAction::Confirm => 4,
            InputAction::Pause => 5,
        }
    }
}

/// Auto-repeat for held menu-navigation keys: fires immediately on press,
/// then after `initial_delay_ticks`, then every `repeat_interval_ticks`.
#[derive(Debug, Clone, Copy)]
pub struct KeyRepeat {
    initial_delay_ticks: u32,
    repeat_interval_ticks: u32,
    held_ticks: u32,
}

impl KeyRepeat {
    pub fn new(initial_delay_ticks: u32, repeat_interval_ticks: u32) -> Self {
        Self {
            initial_delay_ticks,
            repeat_interval_ticks: repeat_interval_ticks.max(1),
            held_ticks: 0,
        }
    }

    /// Advances one tick with the key's current held state; returns whether
    /// a navigation pulse fires this tick.
    pub fn tick(&mut self, is_down: bool) -> bool {
        if !is_down {
            self.held_ticks = 0;
            return false;
        }

        let fires = if self.held_ticks == 0 {
            true
        } else if self.held_ticks < self.initial_delay_ticks {
            false
        } else {
            (self.held_ticks - self.initial_delay_ticks) % self.repeat_interval_ticks == 0
        };
        self.held_ticks = self.held_ticks.saturating_add(1);
        fires
    }
}
