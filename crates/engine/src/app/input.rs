use super::scene::Vec2;

/// Level-triggered actions: sampled as "currently held" every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
}

const ACTION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
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
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    /// Conventional button number: 1 left, 2 middle, 3 right.
    pub const fn id(self) -> u8 {
        match self {
            PointerButton::Left => 1,
            PointerButton::Middle => 2,
            PointerButton::Right => 3,
        }
    }
}

/// Edge-triggered events, delivered exactly once in the tick after they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    Restart,
    ToggleMenu,
    Digit(u8),
    /// Jump key went down since the last tick, even if already released.
    Jump,
    PointerDown {
        button: PointerButton,
        position_px: Vec2,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    events: Vec<InputEvent>,
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        events: Vec<InputEvent>,
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
    ) -> Self {
        Self {
            events,
            actions,
            cursor_position_px,
        }
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn quit_requested(&self) -> bool {
        self.events.contains(&InputEvent::Quit)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }
}
