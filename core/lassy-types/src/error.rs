use core::fmt;

/// Rejected word-type constructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Complex and colored types need at least one argument.
    EmptyArguments,
    EmptyColors,
    ColorCountMismatch { arguments: usize, colors: usize },
    EmptyCombinator,
    /// `compose` got a different number of argument groups and color groups.
    UnevenComposition { types: usize, colors: usize },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::EmptyArguments => write!(f, "expected a non-empty tuple of argument types"),
            TypeError::EmptyColors => write!(f, "expected a non-empty tuple of colors"),
            TypeError::ColorCountMismatch { arguments, colors } => write!(
                f,
                "uneven amount of arguments ({}) and colors ({})",
                arguments, colors
            ),
            TypeError::EmptyCombinator => write!(f, "expected a non-empty tuple of combined types"),
            TypeError::UnevenComposition { types, colors } => write!(
                f,
                "uneven number of types ({}) and colors ({})",
                types, colors
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TypeError {}
