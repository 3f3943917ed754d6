//! Errors surfaced by the tables, the capacity strategies and the pooled
//! containers.

/// Represents errors that can occur in this crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The capacity strategy cannot satisfy a growth request.
    ///
    /// Both sizes are kept in decimal form for diagnostics.
    OutOfCapacity {
        current_capacity: String,
        required_size: String,
    },

    /// A non-`try` accessor was called for an absent key
    KeyNotFound(i32),

    /// An argument (or a strategy result) that cannot be used
    InvalidArgument(&'static str),
}

impl Error {
    pub(crate) fn out_of_capacity(current_capacity: usize, required_size: usize) -> Self {
        Self::OutOfCapacity {
            current_capacity: current_capacity.to_string(),
            required_size: required_size.to_string(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfCapacity {
                current_capacity,
                required_size,
            } => write!(
                f,
                "out of capacity: current capacity {current_capacity}, required size {required_size}"
            ),
            Self::KeyNotFound(key) => write!(f, "key not found: {key}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Crate result
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn out_of_capacity_keeps_decimal_sizes() {
        let e = Error::out_of_capacity(1_000_000, 2_000_000);
        assert_eq!(
            e,
            Error::OutOfCapacity {
                current_capacity: "1000000".to_string(),
                required_size: "2000000".to_string(),
            }
        );
        assert_eq!(
            e.to_string(),
            "out of capacity: current capacity 1000000, required size 2000000"
        );
    }

    #[test]
    fn key_not_found_names_the_key() {
        assert_eq!(Error::KeyNotFound(-7).to_string(), "key not found: -7");
    }
}
