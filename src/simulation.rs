use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use super::config::RunConfig;
use super::error::{Error, Result};
use super::maps::{CellValue, TimeStep, ValueField};
use super::pathfinding::Planner;
use super::result::{DronePath, RunResult};
use super::vec2::Vec2;
use super::world::Drone;

/// Time-stepped run of every drone over one shared field.
///
/// Drones move in registration order within a step, so a drone sees the cells drained by
/// the drones before it in that same step.
pub struct Simulation<'a> {
    field: &'a mut ValueField,
    drones: &'a mut [Drone],
    planner: &'a dyn Planner,
    total_score: u64,
}

impl<'a> Simulation<'a> {
    /// Fails before touching any state when there is nothing to simulate or a drone starts
    /// off the grid.
    pub fn new(
        field: &'a mut ValueField,
        drones: &'a mut [Drone],
        planner: &'a dyn Planner,
    ) -> Result<Self> {
        if drones.is_empty() {
            return Err(Error::Configuration("no drones to run".into()));
        }

        if let Some(drone) = drones.iter().find(|d| !field.in_bounds(d.pos())) {
            return Err(Error::OutOfRange {
                x: drone.pos().x,
                y: drone.pos().y,
                side: field.side(),
            });
        }

        Ok(Simulation {
            field,
            drones,
            planner,
            total_score: 0,
        })
    }

    fn collect_and_update(&mut self, idx: usize, pos: Vec2, t: TimeStep) -> Result<CellValue> {
        let gain = self.field.collectible_value(pos, t)?;
        self.drones[idx].commit_move(pos, t, gain);
        self.field.mark_visited(pos, t)?;
        self.total_score += u64::from(gain);
        Ok(gain)
    }

    fn step_drone(&mut self, idx: usize, t: TimeStep) -> Result<()> {
        let pos = self.drones[idx].pos();

        match self.planner.best_move(self.field, pos, t) {
            Some(mov) if self.field.in_bounds(pos + mov) => {
                let gain = self.collect_and_update(idx, pos + mov, t)?;
                trace!(drone = self.drones[idx].id(), t, to = %(pos + mov), gain, "move");
            }
            _ => {
                // nowhere to go: hold position and collect nothing
                self.drones[idx].commit_move(pos, t, 0);
                self.field.mark_visited(pos, t)?;
                trace!(drone = self.drones[idx].id(), t, at = %pos, "no legal move");
            }
        }

        Ok(())
    }

    pub fn run(mut self, cfg: &RunConfig) -> Result<RunResult> {
        let start = Instant::now();
        let budget = Duration::from_millis(cfg.time_budget_ms);

        info!(
            drones = self.drones.len(),
            side = self.field.side(),
            steps = cfg.total_steps,
            budget_ms = cfg.time_budget_ms,
            horizon = cfg.horizon,
            "starting run"
        );

        for idx in 0..self.drones.len() {
            let pos = self.drones[idx].pos();
            self.collect_and_update(idx, pos, 0)?;
        }

        let mut steps_done: TimeStep = 1;
        for t in 1..cfg.total_steps {
            if start.elapsed() >= budget {
                debug!(t, elapsed_ms = start.elapsed().as_millis() as u64, "time budget exhausted");
                break;
            }

            for idx in 0..self.drones.len() {
                self.step_drone(idx, t)?;
            }
            steps_done += 1;
        }

        let time_elapsed_ms = start.elapsed().as_millis() as u64;

        for drone in self.drones.iter() {
            debug!(drone = drone.id(), collected = drone.collected(), "drone done");
        }

        info!(
            steps = steps_done,
            score = self.total_score,
            elapsed_ms = time_elapsed_ms,
            "run finished"
        );

        Ok(RunResult {
            total_score: self.total_score,
            drones: self.drones.len(),
            time_elapsed_ms,
            paths: self.drones.iter().map(DronePath::snapshot).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::GreedyLookahead;

    fn cfg(total_steps: u32, allow_stay: bool) -> RunConfig {
        RunConfig {
            total_steps,
            time_budget_ms: 60_000,
            horizon: 1,
            allow_stay,
            ..RunConfig::default()
        }
    }

    #[test]
    fn zero_drones_is_rejected_without_mutation() {
        let mut field = ValueField::with_uniform(2, 5, 0.5).unwrap();
        let planner = GreedyLookahead::new(&cfg(3, true));

        let err = Simulation::new(&mut field, &mut [], &planner).err();
        assert!(matches!(err, Some(Error::Configuration(_))));
        for x in 0..2 {
            for y in 0..2 {
                assert_eq!(field.last_visit(Vec2::new(x, y)).unwrap(), None);
            }
        }
    }

    #[test]
    fn off_grid_start_is_rejected() {
        let mut field = ValueField::with_uniform(2, 5, 0.5).unwrap();
        let mut drones = vec![Drone::new(0, Vec2::new(0, 0)), Drone::new(1, Vec2::new(2, 0))];
        let planner = GreedyLookahead::new(&cfg(3, true));

        let err = Simulation::new(&mut field, &mut drones, &planner).err();
        assert!(matches!(err, Some(Error::OutOfRange { x: 2, y: 0, side: 2 })));
        assert!(drones[0].path().is_empty());
    }

    #[test]
    fn single_step_only_visits_start() {
        let mut field = ValueField::with_uniform(3, 4, 1.0).unwrap();
        let mut drones = vec![Drone::new(0, Vec2::new(1, 1))];
        let config = cfg(1, true);
        let planner = GreedyLookahead::new(&config);

        let result = Simulation::new(&mut field, &mut drones, &planner)
            .unwrap()
            .run(&config)
            .unwrap();

        assert_eq!(result.total_score, 4);
        assert_eq!(result.paths[0].steps, 1);
        assert_eq!(field.last_visit(Vec2::new(1, 1)).unwrap(), Some(0));
    }

    #[test]
    fn trapped_drone_holds_position_for_nothing() {
        let mut field = ValueField::with_uniform(1, 9, 1.0).unwrap();
        let mut drones = vec![Drone::new(0, Vec2::new(0, 0))];
        let config = cfg(4, false);
        let planner = GreedyLookahead::new(&config);

        let result = Simulation::new(&mut field, &mut drones, &planner)
            .unwrap()
            .run(&config)
            .unwrap();

        assert_eq!(result.total_score, 9);
        let values: Vec<_> = result.paths[0].path.iter().map(|s| s.value_collected).collect();
        assert_eq!(values, vec![9, 0, 0, 0]);
        assert!(result.paths[0].path.iter().all(|s| s.pos() == Vec2::new(0, 0)));
    }

    #[test]
    fn later_drone_sees_earlier_drone_visit() {
        // both drones start next to the only valuable cell
        let mut values = vec![0; 9];
        values[4] = 50;
        let mut field = ValueField::from_values(3, &values, 0.0).unwrap();
        let mut drones = vec![Drone::new(0, Vec2::new(1, 0)), Drone::new(1, Vec2::new(1, 2))];
        let config = cfg(2, false);
        let planner = GreedyLookahead::new(&config);

        let result = Simulation::new(&mut field, &mut drones, &planner)
            .unwrap()
            .run(&config)
            .unwrap();

        assert_eq!(result.paths[0].path[1].pos(), Vec2::new(1, 1));
        assert_eq!(result.paths[0].path[1].value_collected, 50);
        assert_eq!(result.paths[1].path[1].value_collected, 0);
        assert_eq!(result.total_score, 50);
    }
}
