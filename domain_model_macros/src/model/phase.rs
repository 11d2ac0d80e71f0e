//! Two-state lifecycle shared by the single-use builders.

use super::error::BuilderStateError;

/// Either still accumulating `T` or frozen after `finish`.
pub(crate) enum Phase<T> {
    Building(T),
    Built,
}

impl<T> Phase<T> {
    /// Borrows the accumulated state, failing once the builder is frozen.
    pub(crate) fn building(&mut self, builder: &'static str) -> Result<&mut T, BuilderStateError> {
        match self {
            Self::Building(state) => Ok(state),
            Self::Built => Err(BuilderStateError::AlreadyFinished { builder }),
        }
    }

    /// Moves the state out and freezes the builder.
    pub(crate) fn freeze(&mut self, builder: &'static str) -> Result<T, BuilderStateError> {
        match std::mem::replace(self, Self::Built) {
            Self::Building(state) => Ok(state),
            Self::Built => Err(BuilderStateError::AlreadyFinished { builder }),
        }
    }
}
