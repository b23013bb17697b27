use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::config::RunConfig;
use super::maps::{TimeStep, ValueField};
use super::moves::{legal_moves, Move};
use super::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    One,
    Two,
}

impl Horizon {
    pub fn clamped(steps: u8) -> Self {
        if steps >= 2 {
            Horizon::Two
        } else {
            Horizon::One
        }
    }

    pub fn steps(self) -> u8 {
        match self {
            Horizon::One => 1,
            Horizon::Two => 2,
        }
    }
}

/// How the two-step horizon picks the displacement of the second step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SecondStep {
    /// Every inner candidate repeats the first displacement, so the continuation is always
    /// "keep going straight".
    #[default]
    RepeatFirst,
    Independent,
}

/// Picks the next move for a drone standing at `pos` at time `now`.
///
/// `None` means no candidate was inside the grid.
pub trait Planner {
    fn best_move(&self, field: &ValueField, pos: Vec2, now: TimeStep) -> Option<Move>;
}

#[derive(Debug, Clone)]
pub struct GreedyLookahead {
    horizon: Horizon,
    moves: &'static [Move],
    second_step: SecondStep,
}

impl GreedyLookahead {
    pub fn new(cfg: &RunConfig) -> Self {
        GreedyLookahead {
            horizon: Horizon::clamped(cfg.horizon),
            moves: legal_moves(cfg.allow_stay),
            second_step: cfg.second_step,
        }
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn moves(&self) -> &'static [Move] {
        self.moves
    }

    // p1 is entered at `now` via `first`
    fn best_continuation(
        &self,
        field: &ValueField,
        p1: Vec2,
        first: Move,
        now: TimeStep,
    ) -> Option<i64> {
        let mut best = None;

        for &second in self.moves {
            let step = match self.second_step {
                SecondStep::RepeatFirst => first,
                SecondStep::Independent => second,
            };

            let Ok(gain) =
                field.collectible_value_with_override(p1 + step, now.saturating_add(1), p1, now)
            else {
                continue;
            };

            best = best.max(Some(i64::from(gain)));
        }

        best
    }
}

impl Planner for GreedyLookahead {
    fn best_move(&self, field: &ValueField, pos: Vec2, now: TimeStep) -> Option<Move> {
        let mut best: Option<(i64, Move)> = None;

        for &first in self.moves {
            let p1 = pos + first;

            // out of grid
            let Ok(gain1) = field.collectible_value(p1, now) else {
                continue;
            };
            let gain1 = i64::from(gain1);

            let combined = match self.horizon {
                Horizon::One => gain1,
                Horizon::Two => match self.best_continuation(field, p1, first, now) {
                    Some(gain2) => gain1 + gain2,
                    None => gain1,
                },
            };

            if best.map_or(true, |(score, _)| combined > score) {
                best = Some((combined, first));
            }
        }

        best.map(|(_, mov)| mov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(horizon: u8, allow_stay: bool, second_step: SecondStep) -> RunConfig {
        RunConfig {
            horizon,
            allow_stay,
            second_step,
            ..RunConfig::default()
        }
    }

    fn field(side: usize, cells: &[((i32, i32), i64)]) -> ValueField {
        let mut values = vec![0; side * side];
        for &((x, y), v) in cells {
            values[y as usize * side + x as usize] = v;
        }
        ValueField::from_values(side, &values, 0.0).unwrap()
    }

    #[test]
    fn horizon_is_clamped() {
        assert_eq!(Horizon::clamped(0), Horizon::One);
        assert_eq!(Horizon::clamped(1), Horizon::One);
        assert_eq!(Horizon::clamped(2), Horizon::Two);
        assert_eq!(Horizon::clamped(9), Horizon::Two);
        assert_eq!(Horizon::clamped(9).steps(), 2);
    }

    #[test]
    fn one_step_takes_richest_neighbour() {
        let field = field(3, &[((0, 1), 3), ((2, 1), 2), ((1, 2), 5)]);
        let planner = GreedyLookahead::new(&config(1, false, SecondStep::RepeatFirst));

        assert_eq!(planner.best_move(&field, Vec2::new(1, 1), 1), Some(Vec2::new(0, 1)));
    }

    #[test]
    fn ties_go_to_first_in_table() {
        let field = ValueField::with_uniform(3, 4, 0.0).unwrap();
        let planner = GreedyLookahead::new(&config(1, true, SecondStep::RepeatFirst));

        assert_eq!(planner.best_move(&field, Vec2::new(1, 1), 1), Some(Vec2::new(1, 0)));
        assert_eq!(planner.best_move(&field, Vec2::new(2, 1), 1), Some(Vec2::new(-1, 0)));
    }

    #[test]
    fn zero_valued_candidate_still_wins() {
        let field = ValueField::with_uniform(2, 0, 0.0).unwrap();
        let planner = GreedyLookahead::new(&config(2, false, SecondStep::RepeatFirst));

        assert_eq!(planner.best_move(&field, Vec2::new(0, 0), 1), Some(Vec2::new(1, 0)));
    }

    #[test]
    fn single_cell_without_stay_has_no_move() {
        let field = ValueField::with_uniform(1, 9, 1.0).unwrap();
        let planner = GreedyLookahead::new(&config(2, false, SecondStep::RepeatFirst));
        assert_eq!(planner.best_move(&field, Vec2::new(0, 0), 1), None);

        let planner = GreedyLookahead::new(&config(2, true, SecondStep::RepeatFirst));
        assert_eq!(planner.best_move(&field, Vec2::new(0, 0), 1), Some(Vec2::new(0, 0)));
    }

    #[test]
    fn repeat_first_scores_straight_continuation() {
        // (3,3) is only reachable by turning.
        let field = field(5, &[((2, 3), 1), ((3, 3), 20), ((1, 2), 2), ((0, 2), 3)]);
        let planner = GreedyLookahead::new(&config(2, false, SecondStep::RepeatFirst));

        assert_eq!(planner.best_move(&field, Vec2::new(2, 2), 1), Some(Vec2::new(-1, 0)));
    }

    #[test]
    fn independent_second_step_can_turn() {
        let field = field(5, &[((2, 3), 1), ((3, 3), 20), ((1, 2), 2), ((0, 2), 3)]);
        let planner = GreedyLookahead::new(&config(2, false, SecondStep::Independent));

        assert_eq!(planner.best_move(&field, Vec2::new(2, 2), 1), Some(Vec2::new(0, 1)));
    }

    #[test]
    fn staying_scores_the_drained_cell_on_second_step() {
        let mut field = ValueField::with_uniform(1, 8, 1.0).unwrap();
        field.mark_visited(Vec2::new(0, 0), 0).unwrap();
        let planner = GreedyLookahead::new(&config(2, true, SecondStep::RepeatFirst));

        // stay at t=1 collects 8, stay again at t=2 is scored as if visited at t=1
        let continuation = planner.best_continuation(&field, Vec2::new(0, 0), Vec2::new(0, 0), 1);
        assert_eq!(continuation, Some(8));
    }
}
