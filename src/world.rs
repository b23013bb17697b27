use serde::Serialize;

use super::maps::{CellValue, TimeStep};
use super::vec2::Vec2;

/// Upper bound on the path capacity reserved up front; longer paths grow on demand.
pub const MAX_PATH_RESERVE: usize = 4096;

/// One entry of a drone's trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    #[serde(rename = "t")]
    pub time_step: TimeStep,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "value")]
    pub value_collected: CellValue,
}

impl Step {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Passive position and path recorder. Move legality is checked by whoever drives it.
#[derive(Debug, Clone)]
pub struct Drone {
    id: u32,
    start: Vec2,
    pos: Vec2,
    path: Vec<Step>,
}

impl Drone {
    pub fn new(id: u32, start: Vec2) -> Self {
        Drone {
            id,
            start,
            pos: start,
            path: Vec::new(),
        }
    }

    pub fn reset_to_start(&mut self, capacity_hint: usize) {
        self.pos = self.start;
        self.path.clear();
        self.path.reserve(capacity_hint.min(MAX_PATH_RESERVE));
    }

    pub fn commit_move(&mut self, pos: Vec2, t: TimeStep, value: CellValue) {
        self.pos = pos;
        self.path.push(Step {
            time_step: t,
            x: pos.x,
            y: pos.y,
            value_collected: value,
        });
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }

    pub fn collected(&self) -> u64 {
        self.path.iter().map(|s| u64::from(s.value_collected)).sum()
    }
}
