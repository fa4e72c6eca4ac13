//! Date/grid mapping.
//!
//! Pure translation between pointer coordinates on the month grid and the
//! calendar dates laid out on it. Nothing here holds state except
//! [`GridGeometry`], which only caches the cell size derived from the current
//! grid bounds.

use chrono::NaiveDate;

mod day_list;

pub use day_list::{month_grid, week_containing, week_start, DayList, Week};

/// Number of columns in every week row
pub const DAYS_PER_WEEK: usize = 7;

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pixel bounds of the day grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl GridRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("grid bounds {0:?} are not a positive, finite rectangle")]
    InvalidBounds(GridRect),
    #[error("grid needs at least one column and one row, got {columns}x{rows}")]
    EmptyGrid { columns: usize, rows: usize },
    #[error("day list must hold whole weeks, got {0} days")]
    PartialWeek(usize),
    #[error("day list is not consecutive at {0}")]
    NonConsecutive(NaiveDate),
}

/// Divide the grid bounds evenly into `columns` x `rows` cells.
pub fn cell_size(bounds: GridRect, columns: usize, rows: usize) -> Result<CellSize, GeometryError> {
    if columns == 0 || rows == 0 {
        return Err(GeometryError::EmptyGrid { columns, rows });
    }
    if !bounds.is_well_formed() {
        return Err(GeometryError::InvalidBounds(bounds));
    }
    Ok(CellSize {
        width: bounds.width / columns as f32,
        height: bounds.height / rows as f32,
    })
}

/// Resolve the date under the pointer.
///
/// Positions outside the grid clamp to the nearest edge cell, so an
/// overshooting drag still lands on a boundary date.
pub fn pointer_to_date(pointer: Point, origin: Point, cell: CellSize, days: &DayList) -> NaiveDate {
    let column = cell_index(pointer.x - origin.x, cell.width, DAYS_PER_WEEK);
    let row = cell_index(pointer.y - origin.y, cell.height, days.rows());
    days.get(row, column)
}

fn cell_index(offset: f32, extent: f32, count: usize) -> usize {
    let raw = (offset / extent).floor();
    // NaN (zero-sized cell at zero offset) and negatives land on the first cell
    if raw.is_nan() || raw < 0.0 {
        return 0;
    }
    (raw as usize).min(count.saturating_sub(1))
}

/// Column of `date` within `week`, or `None` when the date lies outside it.
pub fn date_to_column(date: NaiveDate, week: &[NaiveDate]) -> Option<usize> {
    week.iter().position(|day| *day == date)
}

/// Column of `date`, clipped to the first or last column when the date falls
/// before or after the week.
pub fn clipped_column(date: NaiveDate, week: &Week) -> usize {
    match date_to_column(date, week) {
        Some(column) => column,
        None if date < week[0] => 0,
        None => DAYS_PER_WEEK - 1,
    }
}

/// Current grid bounds and the cell size derived from them.
///
/// The host calls [`GridGeometry::update_bounds`] whenever the grid's
/// bounding rectangle changes; malformed bounds are refused and the last
/// valid geometry stays in effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    bounds: GridRect,
    rows: usize,
    cell: CellSize,
}

impl GridGeometry {
    pub fn new(bounds: GridRect, rows: usize) -> Result<Self, GeometryError> {
        let cell = cell_size(bounds, DAYS_PER_WEEK, rows)?;
        Ok(Self { bounds, rows, cell })
    }

    pub fn update_bounds(&mut self, bounds: GridRect, rows: usize) -> Result<(), GeometryError> {
        if bounds == self.bounds && rows == self.rows {
            return Ok(());
        }
        match cell_size(bounds, DAYS_PER_WEEK, rows) {
            Ok(cell) => {
                log::debug!("Grid geometry updated: {:?} ({} rows) -> {:?}", bounds, rows, cell);
                self.bounds = bounds;
                self.rows = rows;
                self.cell = cell;
                Ok(())
            }
            Err(err) => {
                log::warn!("Ignoring grid geometry update: {}", err);
                Err(err)
            }
        }
    }

    pub fn bounds(&self) -> GridRect {
        self.bounds
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    pub fn date_at(&self, pointer: Point, days: &DayList) -> NaiveDate {
        pointer_to_date(pointer, self.bounds.origin(), self.cell, days)
    }
}
