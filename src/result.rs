use std::io::Write;

use serde::Serialize;

use super::error::Result;
use super::world::{Drone, Step};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DronePath {
    pub drone_id: u32,
    /// Length of `path`.
    pub steps: usize,
    pub path: Vec<Step>,
}

impl DronePath {
    pub fn snapshot(drone: &Drone) -> Self {
        DronePath {
            drone_id: drone.id(),
            steps: drone.path().len(),
            path: drone.path().to_vec(),
        }
    }
}

/// Outcome of a full run with one or more drones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    #[serde(rename = "score")]
    pub total_score: u64,
    pub drones: usize,
    pub time_elapsed_ms: u64,
    pub paths: Vec<DronePath>,
}

impl RunResult {
    /// Sum of every collected value in every path.
    pub fn path_total(&self) -> u64 {
        self.paths
            .iter()
            .flat_map(|p| &p.path)
            .map(|s| u64::from(s.value_collected))
            .sum()
    }
}

pub fn write_json<W: Write>(writer: W, result: &RunResult, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, result)?;
    } else {
        serde_json::to_writer(writer, result)?;
    }
    Ok(())
}

pub fn to_json(result: &RunResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}
