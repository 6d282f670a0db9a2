use std::{fmt, sync::Arc};

use crate::{ErrorEval, EvalError, ShapeError};

/// A runtime value flowing through function evaluation.
///
/// Scalars (`Number`, `Text`, `Boolean`, `Blank`, `Error`) are what a cell
/// can hold. `Ref` and `Area` are the two reference shapes a function can
/// receive as an argument; both carry the values they currently point at so
/// the evaluator never has to reach back into workbook storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueEval {
    Number(f64),
    Text(String),
    Boolean(bool),
    /// An empty cell. Distinct from `Text("")`.
    Blank,
    Error(ErrorEval),
    Ref(RefEval),
    Area(AreaEval),
}

impl ValueEval {
    pub fn text<S: Into<String>>(s: S) -> Self {
        ValueEval::Text(s.into())
    }

    pub const fn empty_text() -> Self {
        ValueEval::Text(String::new())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ValueEval::Blank)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValueEval::Error(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ValueEval::Ref(_) | ValueEval::Area(_))
    }

    pub fn as_error(&self) -> Option<ErrorEval> {
        match self {
            ValueEval::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Strip one level of single-cell reference; everything else is returned as is.
    pub fn deref_ref(&self) -> &ValueEval {
        match self {
            ValueEval::Ref(r) => r.inner_value(),
            other => other,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ValueEval::Number(_) => "number",
            ValueEval::Text(_) => "text",
            ValueEval::Boolean(_) => "boolean",
            ValueEval::Blank => "blank",
            ValueEval::Error(_) => "error",
            ValueEval::Ref(_) => "reference",
            ValueEval::Area(_) => "area",
        }
    }
}

impl fmt::Display for ValueEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueEval::Number(n) => write!(f, "{n}"),
            ValueEval::Text(s) => write!(f, "{s}"),
            ValueEval::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            ValueEval::Blank => Ok(()),
            ValueEval::Error(e) => write!(f, "{e}"),
            ValueEval::Ref(r) => write!(f, "R{}C{}", r.row + 1, r.col + 1),
            ValueEval::Area(a) => write!(
                f,
                "R{}C{}:R{}C{}",
                a.first_row + 1,
                a.first_col + 1,
                a.last_row + 1,
                a.last_col + 1
            ),
        }
    }
}

impl From<f64> for ValueEval {
    fn from(n: f64) -> Self {
        ValueEval::Number(n)
    }
}

impl From<bool> for ValueEval {
    fn from(b: bool) -> Self {
        ValueEval::Boolean(b)
    }
}

impl From<&str> for ValueEval {
    fn from(s: &str) -> Self {
        ValueEval::Text(s.to_string())
    }
}

impl From<String> for ValueEval {
    fn from(s: String) -> Self {
        ValueEval::Text(s)
    }
}

impl From<RefEval> for ValueEval {
    fn from(r: RefEval) -> Self {
        ValueEval::Ref(r)
    }
}

impl From<AreaEval> for ValueEval {
    fn from(a: AreaEval) -> Self {
        ValueEval::Area(a)
    }
}

/* ───────────────────────────── RefEval ───────────────────────────── */

/// A single-cell reference. Coordinates are 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct RefEval {
    row: u32,
    col: u32,
    value: Box<ValueEval>,
}

impl RefEval {
    pub fn new(row: u32, col: u32, value: ValueEval) -> Self {
        Self {
            row,
            col,
            value: Box::new(value),
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn inner_value(&self) -> &ValueEval {
        &self.value
    }

    /// The same cell viewed as a 1x1 area.
    pub fn to_area(&self) -> AreaEval {
        AreaEval::single(self.row, self.col, (*self.value).clone())
    }
}

/* ───────────────────────────── AreaEval ──────────────────────────── */

/// Backing storage shared between an area and every sub-area offset from it.
#[derive(Debug)]
struct Grid {
    first_row: u32,
    first_col: u32,
    width: usize,
    height: usize,
    values: Vec<ValueEval>,
}

impl Grid {
    fn get(&self, row: u32, col: u32) -> Option<&ValueEval> {
        let r = row.checked_sub(self.first_row)? as usize;
        let c = col.checked_sub(self.first_col)? as usize;
        if r >= self.height || c >= self.width {
            return None;
        }
        self.values.get(r * self.width + c)
    }

    fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.first_row
            && col >= self.first_col
            && ((row - self.first_row) as usize) < self.height
            && ((col - self.first_col) as usize) < self.width
    }
}

/// A rectangular range of cell values, stored row-major.
///
/// Bounds are absolute 0-based sheet coordinates and inclusive on both ends.
/// Cloning is cheap: the cell values live behind an `Arc`, and areas produced
/// by [`AreaEval::offset`] share storage with their parent.
#[derive(Debug, Clone)]
pub struct AreaEval {
    first_row: u32,
    last_row: u32,
    first_col: u32,
    last_col: u32,
    grid: Arc<Grid>,
}

impl AreaEval {
    /// Build an area from a flattened row-major value list.
    pub fn new(
        first_row: u32,
        last_row: u32,
        first_col: u32,
        last_col: u32,
        values: Vec<ValueEval>,
    ) -> Result<Self, ShapeError> {
        if last_row < first_row || last_col < first_col {
            return Err(ShapeError::InvertedBounds {
                first_row,
                last_row,
                first_col,
                last_col,
            });
        }
        let height = (last_row - first_row) as usize + 1;
        let width = (last_col - first_col) as usize + 1;
        if values.len() != height * width {
            return Err(ShapeError::ValueCount {
                height,
                width,
                expected: height * width,
                actual: values.len(),
            });
        }
        Ok(Self {
            first_row,
            last_row,
            first_col,
            last_col,
            grid: Arc::new(Grid {
                first_row,
                first_col,
                width,
                height,
                values,
            }),
        })
    }

    /// Build an area anchored at `(first_row, first_col)` from nested rows.
    pub fn from_rows(
        first_row: u32,
        first_col: u32,
        rows: Vec<Vec<ValueEval>>,
    ) -> Result<Self, ShapeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(ShapeError::ValueCount {
                height,
                width,
                expected: 1,
                actual: 0,
            });
        }
        let mut values = Vec::with_capacity(height * width);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(ShapeError::RaggedRows {
                    row: i,
                    expected: width,
                    actual: row.len(),
                });
            }
            values.extend(row);
        }
        Self::new(
            first_row,
            first_row + height as u32 - 1,
            first_col,
            first_col + width as u32 - 1,
            values,
        )
    }

    fn single(row: u32, col: u32, value: ValueEval) -> Self {
        Self {
            first_row: row,
            last_row: row,
            first_col: col,
            last_col: col,
            grid: Arc::new(Grid {
                first_row: row,
                first_col: col,
                width: 1,
                height: 1,
                values: vec![value],
            }),
        }
    }

    pub fn first_row(&self) -> u32 {
        self.first_row
    }
    pub fn last_row(&self) -> u32 {
        self.last_row
    }
    pub fn first_col(&self) -> u32 {
        self.first_col
    }
    pub fn last_col(&self) -> u32 {
        self.last_col
    }

    pub fn height(&self) -> usize {
        (self.last_row - self.first_row) as usize + 1
    }

    pub fn width(&self) -> usize {
        (self.last_col - self.first_col) as usize + 1
    }

    pub fn len(&self) -> usize {
        self.height() * self.width()
    }

    /// Never true; an area always spans at least one cell.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Exactly one row tall.
    pub fn is_row(&self) -> bool {
        self.first_row == self.last_row
    }

    /// Exactly one column wide.
    pub fn is_column(&self) -> bool {
        self.first_col == self.last_col
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }

    pub fn contains_column(&self, col: u32) -> bool {
        (self.first_col..=self.last_col).contains(&col)
    }

    /// Value at a position relative to the top-left corner.
    ///
    /// # Panics
    /// If `row >= height()` or `col >= width()`. Use
    /// [`try_relative_value`](Self::try_relative_value) when the index comes
    /// from user input.
    pub fn get_relative_value(&self, row: usize, col: usize) -> &ValueEval {
        match self.try_relative_value(row, col) {
            Some(v) => v,
            None => panic!(
                "relative cell ({row}, {col}) is outside a {}x{} area",
                self.height(),
                self.width()
            ),
        }
    }

    pub fn try_relative_value(&self, row: usize, col: usize) -> Option<&ValueEval> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        self.grid
            .get(self.first_row + row as u32, self.first_col + col as u32)
    }

    /// Value at an absolute sheet coordinate, if it lies inside this area.
    pub fn get_absolute_value(&self, row: u32, col: u32) -> Option<&ValueEval> {
        if !self.contains_row(row) || !self.contains_column(col) {
            return None;
        }
        self.grid.get(row, col)
    }

    /// Iterate cells row-major.
    pub fn values(&self) -> impl Iterator<Item = &ValueEval> + '_ {
        let w = self.width();
        (0..self.len()).map(move |i| self.get_relative_value(i / w, i % w))
    }

    /// Iterate cells row-major together with their relative `(row, col)`.
    pub fn indexed_values(&self) -> impl Iterator<Item = ((usize, usize), &ValueEval)> + '_ {
        let w = self.width();
        (0..self.len()).map(move |i| ((i / w, i % w), self.get_relative_value(i / w, i % w)))
    }

    /// A new area whose bounds are given relative to this area's top-left
    /// corner. Offsets may be negative and may describe a larger or smaller
    /// rectangle; inverted pairs are normalised. The result must stay within
    /// the values this area was built from, otherwise `#REF!`.
    pub fn offset(
        &self,
        rel_first_row: i64,
        rel_last_row: i64,
        rel_first_col: i64,
        rel_last_col: i64,
    ) -> Result<AreaEval, EvalError> {
        let abs = |base: u32, rel: i64| -> Result<u32, EvalError> {
            u32::try_from(base as i64 + rel).map_err(|_| {
                EvalError::reference().with_message("offset moves before the first row or column")
            })
        };
        let (r0, r1) = (
            abs(self.first_row, rel_first_row)?,
            abs(self.first_row, rel_last_row)?,
        );
        let (c0, c1) = (
            abs(self.first_col, rel_first_col)?,
            abs(self.first_col, rel_last_col)?,
        );
        let (first_row, last_row) = (r0.min(r1), r0.max(r1));
        let (first_col, last_col) = (c0.min(c1), c0.max(c1));
        if !self.grid.contains(first_row, first_col) || !self.grid.contains(last_row, last_col) {
            return Err(EvalError::reference().with_message(format!(
                "offset R{}C{}:R{}C{} is outside the resolved data",
                first_row + 1,
                first_col + 1,
                last_row + 1,
                last_col + 1
            )));
        }
        Ok(AreaEval {
            first_row,
            last_row,
            first_col,
            last_col,
            grid: Arc::clone(&self.grid),
        })
    }
}

impl PartialEq for AreaEval {
    fn eq(&self, other: &Self) -> bool {
        self.first_row == other.first_row
            && self.last_row == other.last_row
            && self.first_col == other.first_col
            && self.last_col == other.last_col
            && self.values().eq(other.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Vec<ValueEval> {
        ns.iter().map(|n| ValueEval::Number(*n)).collect()
    }

    #[test]
    fn area_dimensions_and_access() {
        let a = AreaEval::new(2, 4, 1, 2, nums(&[1., 2., 3., 4., 5., 6.])).unwrap();
        assert_eq!(a.height(), 3);
        assert_eq!(a.width(), 2);
        assert_eq!(a.get_relative_value(1, 1), &ValueEval::Number(4.0));
        assert_eq!(a.get_absolute_value(4, 1), Some(&ValueEval::Number(5.0)));
        assert_eq!(a.get_absolute_value(5, 1), None);
        assert!(a.try_relative_value(3, 0).is_none());
        assert!(!a.is_row());
        assert!(!a.is_column());
    }

    #[test]
    fn area_rejects_bad_shapes() {
        assert!(matches!(
            AreaEval::new(0, 1, 0, 1, nums(&[1., 2., 3.])),
            Err(ShapeError::ValueCount { expected: 4, actual: 3, .. })
        ));
        assert!(matches!(
            AreaEval::new(3, 1, 0, 0, nums(&[1.])),
            Err(ShapeError::InvertedBounds { .. })
        ));
        assert!(matches!(
            AreaEval::from_rows(0, 0, vec![nums(&[1., 2.]), nums(&[3.])]),
            Err(ShapeError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside a 1x2 area")]
    fn relative_access_out_of_range_panics() {
        let a = AreaEval::new(0, 0, 0, 1, nums(&[1., 2.])).unwrap();
        a.get_relative_value(0, 2);
    }

    #[test]
    fn offset_shares_storage_and_checks_bounds() {
        let a = AreaEval::new(0, 2, 0, 2, nums(&[1., 2., 3., 4., 5., 6., 7., 8., 9.])).unwrap();
        let col = a.offset(0, 2, 1, 1).unwrap();
        assert!(col.is_column());
        assert_eq!(
            col.values().cloned().collect::<Vec<_>>(),
            nums(&[2., 5., 8.])
        );
        // offsets relative to the sub-area can walk back into the parent grid
        let back = col.offset(1, 1, -1, 0).unwrap();
        assert_eq!(back.values().cloned().collect::<Vec<_>>(), nums(&[4., 5.]));
        assert_eq!(
            a.offset(0, 3, 0, 0).unwrap_err().kind,
            ErrorEval::RefInvalid
        );
        assert_eq!(
            a.offset(-1, 0, 0, 0).unwrap_err().kind,
            ErrorEval::RefInvalid
        );
    }

    #[test]
    fn ref_to_area() {
        let r = RefEval::new(4, 7, ValueEval::text("x"));
        let a = r.to_area();
        assert_eq!((a.first_row(), a.first_col()), (4, 7));
        assert!(a.is_row() && a.is_column());
        assert_eq!(a.get_relative_value(0, 0), &ValueEval::text("x"));
    }

    #[test]
    fn display_matches_excel_literals() {
        assert_eq!(ValueEval::Boolean(true).to_string(), "TRUE");
        assert_eq!(ValueEval::Error(ErrorEval::Na).to_string(), "#N/A");
        assert_eq!(ValueEval::Blank.to_string(), "");
    }
}
