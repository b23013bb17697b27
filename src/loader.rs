use std::path::PathBuf;

use tracing::debug;

use super::error::{Error, Result};
use super::maps::{ValueField, MAX_SIDE};

/// Source of the grid a run is played on.
pub trait GridLoader {
    fn load_grid(&self) -> Result<ValueField>;
}

/// Reads a text grid: a line with N, then N lines of N integers. `#` starts a comment.
pub struct GridFileLoader {
    path: PathBuf,
    regrowth_rate: f64,
}

impl GridFileLoader {
    pub fn new(path: impl Into<PathBuf>, regrowth_rate: f64) -> Result<Self> {
        if regrowth_rate < 0.0 {
            return Err(Error::Configuration("regrowth rate must be >= 0".into()));
        }

        Ok(GridFileLoader {
            path: path.into(),
            regrowth_rate,
        })
    }
}

impl GridLoader for GridFileLoader {
    fn load_grid(&self) -> Result<ValueField> {
        let load_error = |message: String| Error::Load {
            path: self.path.clone(),
            message,
        };

        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| load_error(format!("failed to open file: {e}")))?;

        let field =
            parse_grid(&text, self.regrowth_rate).map_err(|e| load_error(e.to_string()))?;

        debug!(path = %self.path.display(), side = field.side(), "loaded grid");
        Ok(field)
    }
}

/// Grid already held in memory, row-major.
pub struct MemoryLoader {
    pub side: usize,
    pub values: Vec<i64>,
    pub regrowth_rate: f64,
}

impl GridLoader for MemoryLoader {
    fn load_grid(&self) -> Result<ValueField> {
        ValueField::from_values(self.side, &self.values, self.regrowth_rate)
    }
}

fn parse_error(msg: impl Into<String>) -> Error {
    Error::Parse(msg.into())
}

fn tokenize(line: &str, line_no: usize) -> Result<Vec<i64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| {
                parse_error(format!("non-integer token '{token}' at line {line_no}"))
            })
        })
        .collect()
}

pub fn parse_grid(text: &str, regrowth_rate: f64) -> Result<ValueField> {
    // (1-based line number, content without comment)
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let content = line.split_once('#').map_or(line, |(before, _)| before);
            (i + 1, content.trim())
        })
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let Some(&(header_no, header)) = lines.first() else {
        return Err(parse_error("empty grid file"));
    };

    let header = tokenize(header, header_no)?;
    let &[n] = header.as_slice() else {
        return Err(parse_error("first line must contain a single integer N"));
    };

    if n <= 0 {
        return Err(parse_error("N must be positive"));
    }
    if n > MAX_SIDE as i64 {
        return Err(Error::Overflow(format!("N too large: {n}")));
    }
    let n = n as usize;

    let rows = &lines[1..];
    if rows.len() < n {
        return Err(parse_error(format!(
            "not enough grid rows after header N={n}; provided={}",
            rows.len()
        )));
    }

    let mut values = Vec::with_capacity(n * n);
    for &(line_no, row) in &rows[..n] {
        let row = tokenize(row, line_no)?;
        if row.len() != n {
            return Err(parse_error(format!(
                "row at line {line_no} must have exactly N integers (found {})",
                row.len()
            )));
        }
        values.extend(row);
    }

    ValueField::from_values(n, &values, regrowth_rate)
}
