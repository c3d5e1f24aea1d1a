//! Mutable views into rectangular blocks of a [`Matrix`].
//!
//! A [`ViewRef`] refers to a block of another matrix (its *owner*) and reads and writes the
//! owner's storage directly. Views are built on [`Cell`]s, so several of them can exist at once
//! and even overlap: two rows of the same matrix can be swapped through their views, which is
//! what the row and column exchanges in [`PartialPivLu`](crate::PartialPivLu) do.
//!
//! ```
//! # use embedded_math::*;
//! let mut m = Matrix::from_rows([
//!     [1, 2],
//!     [3, 4],
//! ]);
//! let cells = m.as_cells();
//! cells.row(0).swap(&cells.row(1));
//! assert_eq!(m, Matrix::from_rows([
//!     [3, 4],
//!     [1, 2],
//! ]));
//! ```

use std::{
    cell::Cell,
    fmt,
    ops::{Index, Range},
};

use crate::Matrix;

/// Checks that an `SR x SC` block fits into an `R x C` matrix.
struct BlockShape<const SR: usize, const SC: usize, const R: usize, const C: usize>;

impl<const SR: usize, const SC: usize, const R: usize, const C: usize> BlockShape<SR, SC, R, C> {
    const FITS: () = assert!(SR <= R && SC <= C, "block is larger than the matrix");
}

/// Sub-view construction.
impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Returns a handle that can create any number of (possibly overlapping) views into `self`.
    ///
    /// `self` stays mutably borrowed for as long as the handle or any view created from it is
    /// alive.
    pub fn as_cells(&mut self) -> MatrixCells<'_, T, R, C> {
        MatrixCells {
            cells: Cell::from_mut(self.as_mut_slice()).as_slice_of_cells(),
        }
    }

    /// Returns a view of the `SR x SC` block whose top-left element is at
    /// `(start_row, start_col)`.
    ///
    /// The block size is checked at compile time; its position only in debug builds.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mut m = Matrix3::<i32>::ZERO;
    /// m.block::<2, 2>(1, 1).fill(7);
    /// assert_eq!(m, Matrix::from_rows([
    ///     [0, 0, 0],
    ///     [0, 7, 7],
    ///     [0, 7, 7],
    /// ]));
    /// ```
    pub fn block<const SR: usize, const SC: usize>(
        &mut self,
        start_row: usize,
        start_col: usize,
    ) -> ViewRef<'_, T> {
        self.as_cells().block::<SR, SC>(start_row, start_col)
    }

    /// Returns a view of the `rows x cols` block whose top-left element is at
    /// `(start_row, start_col)`.
    pub fn dyn_block(
        &mut self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    ) -> ViewRef<'_, T> {
        self.as_cells().dyn_block(start_row, start_col, rows, cols)
    }

    /// Returns a `1 x C` view of row `row`.
    pub fn row(&mut self, row: usize) -> ViewRef<'_, T> {
        self.as_cells().row(row)
    }

    /// Returns an `R x 1` view of column `col`.
    pub fn col(&mut self, col: usize) -> ViewRef<'_, T> {
        self.as_cells().col(col)
    }
}

impl<T: Copy, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Creates a matrix by copying elements out of a view.
    ///
    /// Element `i` of the matrix (in column-major order) is read from linear index `i` of the
    /// view. The view must have at least `R * C` elements.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mut m = Matrix::from_rows([
    ///     [1, 2, 3],
    ///     [4, 5, 6],
    /// ]);
    /// let col = Vector2::from_view(&m.col(1));
    /// assert_eq!(col, vec2(2, 5));
    /// ```
    pub fn from_view(view: &ViewRef<'_, T>) -> Self {
        debug_assert!(
            R * C <= view.len(),
            "cannot copy {}x{} matrix out of {}-element view",
            R,
            C,
            view.len(),
        );
        Self::from_fn(|row, col| view.get(col * R + row))
    }
}

impl<T: Copy, const R: usize, const C: usize> From<ViewRef<'_, T>> for Matrix<T, R, C> {
    fn from(view: ViewRef<'_, T>) -> Self {
        Self::from_view(&view)
    }
}

/// A [`Matrix`] whose elements are [`Cell`]s, obtained via [`Matrix::as_cells`].
///
/// This is the entry point for creating several views into the same matrix at once.
pub struct MatrixCells<'a, T, const R: usize, const C: usize> {
    cells: &'a [Cell<T>],
}

impl<'a, T, const R: usize, const C: usize> Clone for MatrixCells<'a, T, R, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, const R: usize, const C: usize> Copy for MatrixCells<'a, T, R, C> {}

impl<'a, T, const R: usize, const C: usize> MatrixCells<'a, T, R, C> {
    /// Returns a view of the `SR x SC` block at `(start_row, start_col)`.
    pub fn block<const SR: usize, const SC: usize>(
        self,
        start_row: usize,
        start_col: usize,
    ) -> ViewRef<'a, T> {
        let () = BlockShape::<SR, SC, R, C>::FITS;
        self.dyn_block(start_row, start_col, SR, SC)
    }

    /// Returns a view of the `rows x cols` block at `(start_row, start_col)`.
    pub fn dyn_block(
        self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    ) -> ViewRef<'a, T> {
        debug_assert!(
            start_row + rows <= R && start_col + cols <= C,
            "{rows}x{cols} block at ({start_row}, {start_col}) exceeds {R}x{C} matrix",
        );
        ViewRef {
            cells: self.cells,
            owner_rows: R,
            start_row,
            start_col,
            rows,
            cols,
        }
    }

    /// Returns a `1 x C` view of row `row`.
    pub fn row(self, row: usize) -> ViewRef<'a, T> {
        self.dyn_block(row, 0, 1, C)
    }

    /// Returns an `R x 1` view of column `col`.
    pub fn col(self, col: usize) -> ViewRef<'a, T> {
        self.dyn_block(0, col, R, 1)
    }
}

/// A mutable, aliasable view of a rectangular block of a [`Matrix`].
///
/// Elements are addressed either by `(row, col)` relative to the block's top-left corner, or by a
/// linear index that walks the block in column-major order (like [`Matrix`] storage).
///
/// Bounds are only checked by debug assertions. Out-of-range accesses in release builds either
/// panic on the underlying slice or touch a different element of the owner matrix.
pub struct ViewRef<'a, T> {
    cells: &'a [Cell<T>],
    owner_rows: usize,
    start_row: usize,
    start_col: usize,
    rows: usize,
    cols: usize,
}

impl<'a, T> Clone for ViewRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ViewRef<'a, T> {}

impl<'a, T> ViewRef<'a, T> {
    /// Returns the number of rows in the view.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns in the view.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn offset(&self, index: usize) -> usize {
        debug_assert!(
            index < self.len(),
            "index {index} out of bounds for {}-element view",
            self.len(),
        );
        (index / self.rows + self.start_col) * self.owner_rows + index % self.rows + self.start_row
    }

    #[inline]
    fn offset_at(&self, row: usize, col: usize) -> usize {
        debug_assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) out of bounds for {}x{} view",
            self.rows,
            self.cols,
        );
        (col + self.start_col) * self.owner_rows + row + self.start_row
    }

    /// Returns the cell at linear (column-major) index `index` of the view.
    #[inline]
    pub fn cell(&self, index: usize) -> &'a Cell<T> {
        &self.cells[self.offset(index)]
    }

    /// Returns the cell at `(row, col)` of the view.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> &'a Cell<T> {
        &self.cells[self.offset_at(row, col)]
    }

    #[inline]
    pub fn get(&self, index: usize) -> T
    where
        T: Copy,
    {
        self.cell(index).get()
    }

    #[inline]
    pub fn set(&self, index: usize, value: T) {
        self.cell(index).set(value);
    }

    #[inline]
    pub fn get_at(&self, row: usize, col: usize) -> T
    where
        T: Copy,
    {
        self.cell_at(row, col).get()
    }

    #[inline]
    pub fn set_at(&self, row: usize, col: usize, value: T) {
        self.cell_at(row, col).set(value);
    }

    /// Copies the elements of `src` into the view, in linear (column-major) order.
    ///
    /// `src` may have any shape, as long as it has no more elements than the view.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mut m = Matrix::<i32, 3, 3>::ZERO;
    /// m.row(2).assign(&vec3(1, 2, 3));
    /// assert_eq!(m, Matrix::from_rows([
    ///     [0, 0, 0],
    ///     [0, 0, 0],
    ///     [1, 2, 3],
    /// ]));
    /// ```
    pub fn assign<const R: usize, const C: usize>(&self, src: &Matrix<T, R, C>)
    where
        T: Copy,
    {
        debug_assert!(
            R * C <= self.len(),
            "cannot assign {R}x{C} matrix to {}-element view",
            self.len(),
        );
        for (i, &value) in src.as_slice().iter().enumerate() {
            self.set(i, value);
        }
    }

    /// Sets every element of the view to `value`.
    pub fn fill(&self, value: T)
    where
        T: Copy,
    {
        for i in 0..self.len() {
            self.set(i, value);
        }
    }

    /// Copies the viewed elements into a new [`Matrix`].
    ///
    /// See [`Matrix::from_view`].
    pub fn to_matrix<const R: usize, const C: usize>(&self) -> Matrix<T, R, C>
    where
        T: Copy,
    {
        Matrix::from_view(self)
    }

    /// Returns the owner's storage range if the view's elements are contiguous in it.
    fn contiguous(&self) -> Option<Range<usize>> {
        if self.rows == self.owner_rows || self.cols == 1 {
            let start = (self.start_col * self.owner_rows) + self.start_row;
            Some(start..start + self.len())
        } else {
            None
        }
    }

    /// Exchanges the contents of `self` and `other` element by element (in linear order).
    ///
    /// Both views must have the same number of elements. They may belong to the same matrix and
    /// may even overlap; overlapping elements are exchanged in increasing linear order.
    ///
    /// Views covering whole columns (or parts of a single column) are exchanged as contiguous
    /// runs of storage; everything else, like the rows of a column-major matrix, takes the
    /// element-wise path.
    ///
    /// ```
    /// # use embedded_math::*;
    /// let mut m = Matrix::from_rows([
    ///     [1, 2, 3],
    ///     [4, 5, 6],
    /// ]);
    /// let cells = m.as_cells();
    /// cells.col(0).swap(&cells.col(2));
    /// assert_eq!(m, Matrix::from_rows([
    ///     [3, 2, 1],
    ///     [6, 5, 4],
    /// ]));
    /// ```
    pub fn swap(&self, other: &ViewRef<'_, T>) {
        debug_assert_eq!(self.len(), other.len(), "swapped views differ in size");

        match (self.contiguous(), other.contiguous()) {
            (Some(a), Some(b)) => {
                for (a, b) in self.cells[a].iter().zip(&other.cells[b]) {
                    a.swap(b);
                }
            }
            _ => {
                for i in 0..self.len() {
                    self.cell(i).swap(other.cell(i));
                }
            }
        }
    }
}

impl<'a, T> Index<usize> for ViewRef<'a, T> {
    type Output = Cell<T>;

    fn index(&self, index: usize) -> &Self::Output {
        self.cell(index)
    }
}

impl<'a, T> Index<(usize, usize)> for ViewRef<'a, T> {
    type Output = Cell<T>;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        self.cell_at(row, col)
    }
}

impl<'a, T> fmt::Debug for ViewRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ViewRef {}x{} @ ({}, {})",
            self.rows, self.cols, self.start_row, self.start_col
        )
    }
}
