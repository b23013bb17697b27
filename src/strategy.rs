use tracing::{debug, info};

use super::config::RunConfig;
use super::error::{Error, Result};
use super::loader::GridLoader;
use super::maps::ValueField;
use super::pathfinding::{GreedyLookahead, Planner};
use super::result::RunResult;
use super::simulation::Simulation;
use super::vec2::Vec2;
use super::world::Drone;

/// Wires a grid source, a planner and a set of drones into runnable simulations.
pub struct Strategy {
    loader: Box<dyn GridLoader>,
    planner: Box<dyn Planner>,
    field: Option<ValueField>,
    drones: Vec<Drone>,
    cfg: RunConfig,
}

impl Strategy {
    /// Drones are numbered from 0 in the order of `starts`.
    pub fn new(
        loader: Box<dyn GridLoader>,
        planner: Box<dyn Planner>,
        starts: Vec<Vec2>,
        cfg: RunConfig,
    ) -> Self {
        let drones = starts
            .into_iter()
            .enumerate()
            .map(|(id, start)| Drone::new(id as u32, start))
            .collect();

        Strategy {
            loader,
            planner,
            field: None,
            drones,
            cfg,
        }
    }

    /// Uses the greedy lookahead planner described by `cfg`.
    pub fn greedy(loader: Box<dyn GridLoader>, starts: Vec<Vec2>, cfg: RunConfig) -> Self {
        let planner = GreedyLookahead::new(&cfg);
        debug!(
            horizon = planner.horizon().steps(),
            moves = planner.moves().len(),
            second_step = ?cfg.second_step,
            "greedy planner"
        );
        Self::new(loader, Box::new(planner), starts, cfg)
    }

    pub fn load(&mut self) -> Result<()> {
        let field = self.loader.load_grid()?;

        for drone in &self.drones {
            let start = drone.start();
            if !field.in_bounds(start) {
                return Err(Error::OutOfRange {
                    x: start.x,
                    y: start.y,
                    side: field.side(),
                });
            }
        }

        info!(side = field.side(), drones = self.drones.len(), "grid loaded");
        self.field = Some(field);
        Ok(())
    }

    pub fn run(&mut self) -> Result<RunResult> {
        self.cfg.validate()?;

        let Some(field) = self.field.as_mut() else {
            return Err(Error::Configuration("grid not loaded".into()));
        };

        field.reset_visits();
        for drone in &mut self.drones {
            drone.reset_to_start(self.cfg.total_steps as usize);
        }

        Simulation::new(field, &mut self.drones, self.planner.as_ref())?.run(&self.cfg)
    }

    pub fn field(&self) -> Option<&ValueField> {
        self.field.as_ref()
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }
}
