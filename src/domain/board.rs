/// Board model: a grid of hex cells, one row per question level.
///
/// Row 0 is the entry level; the last row is the goal. A cell is `Active`
/// while a pawn stands on it and `Passed` otherwise. Moving a pawn toggles
/// the cell it leaves and the cell it enters.

use crate::error::GameError;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellStatus {
    #[default]
    Passed,
    Active,
}

impl CellStatus {
    pub fn toggled(self) -> CellStatus {
        match self {
            CellStatus::Passed => CellStatus::Active,
            CellStatus::Active => CellStatus::Passed,
        }
    }
}

/// Pawn position: board row (the player's level) and column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerState {
    pub level: usize,
    pub column: usize,
}

impl PlayerState {
    pub fn new(level: usize, column: usize) -> Self {
        PlayerState { level, column }
    }
}

#[derive(Clone, Debug)]
pub struct BoardModel {
    row_names: Vec<String>,
    ncols: usize,
    cells: Vec<Vec<CellStatus>>,
}

impl BoardModel {
    pub fn new(row_names: Vec<String>, ncols: usize) -> Result<Self, GameError> {
        if row_names.len() < 2 {
            return Err(GameError::InvalidBoard(format!(
                "need at least 2 rows, got {}",
                row_names.len()
            )));
        }
        if ncols == 0 {
            return Err(GameError::InvalidBoard("need at least 1 column".into()));
        }
        let cells = vec![vec![CellStatus::Passed; ncols]; row_names.len()];
        Ok(BoardModel { row_names, ncols, cells })
    }

    /// `(nrows, ncols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.row_names.len(), self.ncols)
    }

    pub fn nrows(&self) -> usize {
        self.row_names.len()
    }

    /// Last row index; a pawn that reaches it wins.
    pub fn goal_row(&self) -> usize {
        self.row_names.len() - 1
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.row_names.len() && col < self.ncols
    }

    /// Flip a cell between Passed and Active. Out of range is a no-op.
    pub fn toggle_pawn_marker(&mut self, row: usize, col: usize) {
        if self.contains(row, col) {
            self.cells[row][col] = self.cells[row][col].toggled();
        }
    }

    pub fn status(&self, row: usize, col: usize) -> CellStatus {
        if self.contains(row, col) {
            self.cells[row][col]
        } else {
            CellStatus::Passed
        }
    }

    pub fn row_name(&self, row: usize) -> &str {
        self.row_names.get(row).map(String::as_str).unwrap_or("")
    }

    /// Every cell back to Passed.
    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(CellStatus::Passed);
        }
    }
}
