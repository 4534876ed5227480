use crate::models::grid::Grid;
use crate::models::puzzle::normalize_letter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Serialized guesses for a grid, as persisted or shared between players.
///
/// Every used cell is keyed `"row_col"`; an empty guess is stored as an
/// empty string. `date` is the capture time in milliseconds since the Unix
/// epoch.
///
/// ```ignore
/// {"date": 1700000000000, "guesses": {"0_0": "C", "0_1": "", "0_2": "T"}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessSnapshot {
    #[serde(default)]
    pub date: u64,

    #[serde(default)]
    pub guesses: IndexMap<String, String>,
}

impl GuessSnapshot {
    /// Capture the grid's guesses, stamped with the current time.
    pub fn capture(grid: &Grid) -> Self {
        Self::capture_at(grid, now_millis())
    }

    pub fn capture_at(grid: &Grid, date: u64) -> Self {
        let guesses = grid
            .used_cells()
            .map(|cell| {
                let guess = cell.guess.map(String::from).unwrap_or_default();
                (cell_key(cell.row, cell.col), guess)
            })
            .collect();

        Self { date, guesses }
    }

    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_blob(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }

    /// Write the stored guesses back into `grid`.
    ///
    /// Keys that do not parse, fall outside the grid or name a black square
    /// are skipped. Cells without a key keep their current guess. Returns the
    /// number of cells whose guess changed.
    pub fn apply_to(&self, grid: &mut Grid) -> usize {
        let mut changed = 0;

        for (key, value) in &self.guesses {
            let Some((row, col)) = parse_key(key) else {
                tracing::debug!("Skipping malformed guess key {:?}", key);
                continue;
            };

            if grid.used_cell(row, col).is_none() {
                tracing::debug!("Skipping guess for unused cell ({}, {})", row, col);
                continue;
            }

            let guess = value.chars().next().map(normalize_letter);
            if grid.set_guess(row, col, guess) {
                changed += 1;
            }
        }

        changed
    }

    /// Number of non-empty guesses.
    pub fn filled(&self) -> usize {
        self.guesses.values().filter(|guess| !guess.is_empty()).count()
    }
}

fn cell_key(row: usize, col: usize) -> String {
    format!("{}_{}", row, col)
}

fn parse_key(key: &str) -> Option<(usize, usize)> {
    let (row, col) = key.split_once('_')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
