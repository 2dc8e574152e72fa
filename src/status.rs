use crate::Error;

/// The outcome of the most recent call to one particular operation.
///
/// Each mutating operation keeps its own status register, so the status of
/// `insert` survives any number of `remove` calls and the other way round.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use probe_table::Error;
/// use probe_table::HashSet;
/// use probe_table::Status;
///
/// let mut set: HashSet<i32> = HashSet::with_capacity(1).unwrap();
/// assert_eq!(set.insert_status(), Status::NotRun);
///
/// set.insert(1).unwrap();
/// assert_eq!(set.insert(2), Err(Error::Full));
/// assert_eq!(set.insert_status(), Status::Failed(Error::Full));
/// assert_eq!(set.remove_status(), Status::NotRun);
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// The operation has not been called yet.
    #[default]
    NotRun,
    /// The last call succeeded.
    Ok,
    /// The last call failed with the given error.
    Failed(Error),
}

impl Status {
    /// Returns `true` if the last call succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Returns the error of the last call, if it failed.
    pub fn error(&self) -> Option<Error> {
        match self {
            Status::Failed(err) => Some(*err),
            _ => None,
        }
    }
}

impl<T> From<&Result<T, Error>> for Status {
    fn from(outcome: &Result<T, Error>) -> Self {
        match outcome {
            Ok(_) => Status::Ok,
            Err(err) => Status::Failed(*err),
        }
    }
}
