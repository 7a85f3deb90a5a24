/// Operator and vector errors.
///
/// These report programming or assembly errors and are returned immediately.
/// Numerical outcomes of solves are reported as [`crate::SolverState`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError
{
    /// Vector spaces that must be compatible are not.
    DimensionMismatch,
    /// Operands of a composite operator have incompatible domain or range.
    IncompatibleSpaces,
    /// The concrete operator does not implement the requested mode.
    UnsupportedOperation,
    /// Block, row or column index out of range.
    IndexOutOfRange,
    /// No operand given to a composite operator factory.
    EmptyOperands,
    /// The operator is not a [`crate::DenseSerialMatrix`].
    NotDense,
}

impl core::fmt::Display for OpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            OpError::DimensionMismatch    => "DimensionMismatch: incompatible vector spaces",
            OpError::IncompatibleSpaces   => "IncompatibleSpaces: operand domain/range do not match",
            OpError::UnsupportedOperation => "UnsupportedOperation: mode not implemented by operator",
            OpError::IndexOutOfRange      => "IndexOutOfRange: index out of range",
            OpError::EmptyOperands        => "EmptyOperands: no operand given",
            OpError::NotDense             => "NotDense: operator is not a dense serial matrix",
        })
    }
}

impl std::error::Error for OpError {}
