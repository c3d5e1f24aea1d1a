use std::fmt;

/// Error returned when inverting or solving with a (nearly) singular matrix.
///
/// A matrix is considered singular when the absolute value of its determinant is below
/// [`Real::EPSILON`](crate::Real::EPSILON).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingularMatrixError<T> {
    determinant: T,
}

impl<T: Copy> SingularMatrixError<T> {
    pub(crate) fn new(determinant: T) -> Self {
        Self { determinant }
    }

    /// Returns the determinant that failed the singularity test.
    pub fn determinant(&self) -> T {
        self.determinant
    }
}

impl<T: fmt::Debug> fmt::Display for SingularMatrixError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matrix is singular (determinant {:?})", self.determinant)
    }
}

impl<T: fmt::Debug> std::error::Error for SingularMatrixError<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = SingularMatrixError::new(0.0f32);
        assert_eq!(err.to_string(), "matrix is singular (determinant 0.0)");
        assert_eq!(err.determinant(), 0.0);
    }
}
