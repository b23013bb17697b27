use super::error::{Error, Result};
use super::vec2::Vec2;

pub type CellValue = u32;
pub type TimeStep = u32;

pub const MAX_SIDE: usize = 10_000;

/// N x N grid of collectible values that drain on visit and regrow linearly afterwards.
#[derive(Debug, Clone)]
pub struct ValueField {
    side: usize,
    base: Vec<CellValue>,
    inc: Vec<CellValue>,
    last_visit: Vec<Option<TimeStep>>,
}

// a positive rate never rounds a non-empty cell down to a zero increment
pub fn regrowth_increment(base: CellValue, rate: f64) -> CellValue {
    if rate == 0.0 {
        return 0;
    }

    let inc = (f64::from(base) * rate).round() as CellValue;

    if rate > 0.0 && base > 0 && inc == 0 {
        1
    } else {
        inc
    }
}

fn regrown(base: CellValue, inc: CellValue, last: Option<TimeStep>, now: TimeStep) -> CellValue {
    let Some(last) = last else {
        return base;
    };

    if now <= last {
        return 0;
    }

    let grown = u64::from(inc) * u64::from(now - last);
    grown.min(u64::from(base)) as CellValue
}

fn cell_count(side: usize) -> Result<usize> {
    if side == 0 {
        return Err(Error::Configuration("N must be positive".into()));
    }

    if side > MAX_SIDE {
        return Err(Error::Overflow(format!(
            "N too large: {side} (maximum {MAX_SIDE})"
        )));
    }

    side.checked_mul(side)
        .ok_or_else(|| Error::Overflow(format!("{side}x{side} cells")))
}

impl ValueField {
    /// Builds a field from row-major base values. Negative values are clamped to 0.
    pub fn from_values(side: usize, values: &[i64], regrowth_rate: f64) -> Result<Self> {
        let total = cell_count(side)?;

        if values.len() != total {
            return Err(Error::Configuration(format!(
                "expected {total} cell values for N={side}, got {}",
                values.len()
            )));
        }

        if !regrowth_rate.is_finite() || !(0.0..=1.0).contains(&regrowth_rate) {
            return Err(Error::Configuration(format!(
                "regrowth rate must be in [0.0, 1.0], got {regrowth_rate}"
            )));
        }

        let base: Vec<CellValue> = values
            .iter()
            .map(|&v| v.clamp(0, i64::from(CellValue::MAX)) as CellValue)
            .collect();

        let inc = base
            .iter()
            .map(|&b| regrowth_increment(b, regrowth_rate))
            .collect();

        Ok(ValueField {
            side,
            base,
            inc,
            last_visit: vec![None; total],
        })
    }

    pub fn with_uniform(side: usize, base: i64, regrowth_rate: f64) -> Result<Self> {
        let total = cell_count(side)?;
        Self::from_values(side, &vec![base; total], regrowth_rate)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.side && (pos.y as usize) < self.side
    }

    pub fn index(&self, pos: Vec2) -> Result<usize> {
        if !self.in_bounds(pos) {
            return Err(Error::OutOfRange {
                x: pos.x,
                y: pos.y,
                side: self.side,
            });
        }
        Ok(pos.y as usize * self.side + pos.x as usize)
    }

    pub fn base(&self, pos: Vec2) -> Result<CellValue> {
        Ok(self.base[self.index(pos)?])
    }

    pub fn increment(&self, pos: Vec2) -> Result<CellValue> {
        Ok(self.inc[self.index(pos)?])
    }

    pub fn last_visit(&self, pos: Vec2) -> Result<Option<TimeStep>> {
        Ok(self.last_visit[self.index(pos)?])
    }

    pub fn collectible_value(&self, pos: Vec2, now: TimeStep) -> Result<CellValue> {
        let k = self.index(pos)?;
        Ok(regrown(self.base[k], self.inc[k], self.last_visit[k], now))
    }

    /// Same as [`collectible_value`](Self::collectible_value), but pretends `override_cell`
    /// was last visited at `override_last_visit`. Used to score a second step as if the
    /// first one had already been committed.
    pub fn collectible_value_with_override(
        &self,
        pos: Vec2,
        now: TimeStep,
        override_cell: Vec2,
        override_last_visit: TimeStep,
    ) -> Result<CellValue> {
        let k = self.index(pos)?;
        let last = if pos == override_cell {
            Some(override_last_visit)
        } else {
            self.last_visit[k]
        };
        Ok(regrown(self.base[k], self.inc[k], last, now))
    }

    pub fn mark_visited(&mut self, pos: Vec2, t: TimeStep) -> Result<()> {
        let k = self.index(pos)?;
        self.last_visit[k] = Some(t);
        Ok(())
    }

    pub fn reset_visits(&mut self) {
        self.last_visit.fill(None);
    }
}
