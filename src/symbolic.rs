use crate::expr::Expr;
use crate::symbol::Symbol;
use nalgebra::{SMatrix, SVector};

/// A matrix whose entries are the symbols produced by `f(row, col)`.
pub fn symbolic_matrix<const R: usize, const C: usize, F>(f: F) -> SMatrix<Expr, R, C>
where
    F: Fn(usize, usize) -> Symbol,
{
    SMatrix::from_fn(|r, c| Expr::symbol(f(r, c)))
}

/// The Jacobian of `column` with respect to `variables`.
///
/// Entry `(i, j)` is `∂column[i] / ∂variables[j]`.
pub fn jacobian<const R: usize, const N: usize>(
    column: &SVector<Expr, R>,
    variables: &[Symbol; N],
) -> SMatrix<Expr, R, N> {
    let expanded = column.map(|e| e.expand());
    SMatrix::from_fn(|r, c| expanded[r].derivative(variables[c]).to_expr())
}

/// Comparisons of symbolic matrices by their expanded entries.
pub trait SymbolicMatrix {
    /// Returns `true` if every entry expands to the zero polynomial.
    fn is_identically_zero(&self) -> bool;

    /// Returns `true` if every pair of entries expands to the same polynomial.
    fn expands_to(&self, other: &Self) -> bool;
}

impl<const R: usize, const C: usize> SymbolicMatrix for SMatrix<Expr, R, C> {
    fn is_identically_zero(&self) -> bool {
        self.iter().all(|e| e.expand().is_zero())
    }

    fn expands_to(&self, other: &Self) -> bool {
        self.iter()
            .zip(other.iter())
            .all(|(a, b)| a.expand() == b.expand())
    }
}
