use crate::app::Simulation;
use crate::stablevec::Handle;
use crate::vecmath::Vector;

/// what a click on the dish does.
/// kill and drag are two toggles that switch each other off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerMode {
    #[default]
    Idle,
    Kill,
    Drag,
}

impl PointerMode {
    pub fn toggle_kill(self) -> Self {
        match self {
            PointerMode::Kill => PointerMode::Idle,
            PointerMode::Idle | PointerMode::Drag => PointerMode::Kill,
        }
    }
    pub fn toggle_drag(self) -> Self {
        match self {
            PointerMode::Drag => PointerMode::Idle,
            PointerMode::Idle | PointerMode::Kill => PointerMode::Drag,
        }
    }
}

/// what a pointer press ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEffect {
    Nothing,
    Killed(usize),
    Grabbed(Handle),
}

impl Simulation {
    /// pointer pressed at `point` (simulation coordinates)
    pub fn pointer_down(&mut self, mode: PointerMode, point: Vector) -> PointerEffect {
        match mode {
            PointerMode::Idle => PointerEffect::Nothing,
            PointerMode::Kill => PointerEffect::Killed(self.kill_near(point)),
            PointerMode::Drag => self
                .pick_for_drag(point)
                .map_or(PointerEffect::Nothing, PointerEffect::Grabbed),
        }
    }
    /// pointer moved, drags the held bacterium along if there is one
    pub fn pointer_move(&mut self, point: Vector) -> bool {
        match self.dragging() {
            Some(h) => self.drag_move(h, point),
            None => false,
        }
    }
    pub fn pointer_up(&mut self) {
        self.release_drag();
    }
}

#[test]
fn toggles_are_exclusive() {
    let m = PointerMode::default();
    assert_eq!(m, PointerMode::Idle);
    let m = m.toggle_kill();
    assert_eq!(m, PointerMode::Kill);
    let m = m.toggle_drag();
    assert_eq!(m, PointerMode::Drag);
    let m = m.toggle_kill();
    assert_eq!(m, PointerMode::Kill);
    assert_eq!(m.toggle_kill(), PointerMode::Idle);
    assert_eq!(PointerMode::Drag.toggle_drag(), PointerMode::Idle);
}
