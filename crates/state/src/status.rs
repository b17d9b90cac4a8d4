use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Phase of the reconciliation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active = 1,
    Syncing = 2,
    Verifying = 3,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "ready"),
            Status::Syncing => write!(f, "syncing"),
            Status::Verifying => write!(f, "verifying"),
        }
    }
}

/// Atomic cell so observers can sample the phase without touching the
/// state lock.
#[derive(Debug)]
pub(crate) struct StatusCell(AtomicI64);

impl StatusCell {
    pub(crate) fn new(status: Status) -> Self {
        Self(AtomicI64::new(status as i64))
    }

    pub(crate) fn store(&self, status: Status) {
        self.0.store(status as i64, Ordering::Release);
    }

    pub(crate) fn load(&self) -> Status {
        match self.0.load(Ordering::Acquire) {
            2 => Status::Syncing,
            3 => Status::Verifying,
            _ => Status::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Status::Active.to_string(), "ready");
        assert_eq!(Status::Syncing.to_string(), "syncing");
        assert_eq!(Status::Verifying.to_string(), "verifying");
    }

    #[test]
    fn test_cell_roundtrip() {
        let cell = StatusCell::new(Status::Active);
        cell.store(Status::Verifying);
        assert_eq!(cell.load(), Status::Verifying);
    }
}
