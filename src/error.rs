use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError
{
    /// The target exists but does not accept the action right now.
    InvalidOperation(String),
    NotFound(String),
    OutOfRange
    {
        index: usize,
        len: usize,
    },
}

impl GameError
{
    pub fn invalid(message: impl Into<String>) -> Self
    {
        GameError::InvalidOperation(message.into())
    }

    pub fn code(&self) -> &'static str
    {
        match self {
            GameError::InvalidOperation(_) => "invalid_operation",
            GameError::NotFound(_) => "not_found",
            GameError::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl fmt::Display for GameError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            GameError::InvalidOperation(message) => write!(f, "{message}"),
            GameError::NotFound(name) => write!(f, "Unknown game '{name}'"),
            GameError::OutOfRange { index, len } => {
                write!(f, "Index {index} is out of range (length {len})")
            }
        }
    }
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn codes_are_stable()
    {
        assert_eq!(GameError::invalid("x").code(), "invalid_operation");
        assert_eq!(GameError::NotFound("x".into()).code(), "not_found");
        assert_eq!(GameError::OutOfRange { index: 3, len: 2 }.code(), "out_of_range");
    }

    #[test]
    fn display_names_the_problem()
    {
        assert_eq!(GameError::NotFound("chess".into()).to_string(), "Unknown game 'chess'");
        assert_eq!(
            GameError::OutOfRange { index: 4, len: 3 }.to_string(),
            "Index 4 is out of range (length 3)"
        );
    }
}
