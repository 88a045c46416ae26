use thiserror::Error;

/// Pixels per inch used when turning a figure size into a canvas.
pub const DEFAULT_DPI: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("figure size must contain only positive, finite values, got {0:?}")]
    NonPositiveFigsize((f64, f64)),
    #[error(
        "all plots must fit within the grid: a {rows}x{cols} grid cannot hold axes for {needed} plot(s)"
    )]
    GridTooSmall {
        rows: usize,
        cols: usize,
        needed: usize,
    },
    #[error("a {rows}x{cols} grid exceeds the limit of 100 subplot cells")]
    GridTooLarge { rows: usize, cols: usize },
    #[error("figure size {0:?} exceeds 100 inches on a side")]
    FigsizeTooLarge((f64, f64)),
}

/// Largest number of subplot cells a figure may have.
pub const MAX_GRID_CELLS: usize = 100;
/// Largest figure side, in inches.
pub const MAX_FIGSIZE_IN: f64 = 100.0;

/// Figure size in inches and subplot grid for one figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub figsize: (f64, f64),
    pub grid: (usize, usize),
}

impl Layout {
    /// One row of 4.5in-wide plots for up to three pairs, two rows otherwise.
    pub fn for_pairs(n: usize) -> Self {
        let n = n.max(1);
        if n <= 3 {
            Self {
                figsize: (n as f64 * 4.5, 4.0),
                grid: (1, n),
            }
        } else {
            Self {
                figsize: (13.5, 8.0),
                grid: (2, n.div_ceil(2)),
            }
        }
    }

    /// Heuristic layout with caller overrides, checked against the number of plots.
    pub fn custom(
        figsize: Option<(f64, f64)>,
        grid: Option<(usize, usize)>,
        n: usize,
    ) -> Result<Self, LayoutError> {
        let auto = Self::for_pairs(n);
        let layout = Self {
            figsize: figsize.unwrap_or(auto.figsize),
            grid: grid.unwrap_or(auto.grid),
        };
        layout.check(n)?;
        Ok(layout)
    }

    /// Check the size is drawable and the grid has a cell for each of `n` plots.
    pub fn check(&self, n: usize) -> Result<(), LayoutError> {
        let (w, h) = self.figsize;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(LayoutError::NonPositiveFigsize((w, h)));
        }
        if w > MAX_FIGSIZE_IN || h > MAX_FIGSIZE_IN {
            return Err(LayoutError::FigsizeTooLarge((w, h)));
        }
        let (rows, cols) = self.grid;
        match rows.checked_mul(cols) {
            Some(cap) if cap > MAX_GRID_CELLS => Err(LayoutError::GridTooLarge { rows, cols }),
            None => Err(LayoutError::GridTooLarge { rows, cols }),
            Some(cap) if rows == 0 || cols == 0 || cap < n => Err(LayoutError::GridTooSmall {
                rows,
                cols,
                needed: n,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Canvas size in pixels at `dpi`.
    pub fn pixels(&self, dpi: f64) -> (u32, u32) {
        let px = |inches: f64| (inches * dpi).round().max(1.0) as u32;
        (px(self.figsize.0), px(self.figsize.1))
    }
}
