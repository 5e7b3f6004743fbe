use thiserror::Error;

use crate::registry::{PinNum, RefDes};

/// Errors raised immediately at a declaration or connection statement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("component {0} already declared")]
    DuplicateReference(RefDes),
    #[error("component {0} declared with no pins")]
    EmptyFootprint(RefDes),
    #[error("pin {pin} of {reference} outside 1..={pin_count}")]
    InvalidPinNumber {
        reference: RefDes,
        pin: PinNum,
        pin_count: u32,
    },
    #[error("net name {proposed:?} conflicts with {existing:?} at {reference}.{pin}")]
    NetNameConflict {
        existing: String,
        proposed: String,
        reference: RefDes,
        pin: PinNum,
    },
    #[error("pin {reference}.{pin} cannot be both connected and no-connect")]
    NoConnectViolation { reference: RefDes, pin: PinNum },
}

/// A consistency violation found at finalization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("pin {reference}.{pin} is neither in a net nor marked no-connect")]
    FloatingPin { reference: RefDes, pin: PinNum },
    #[error("pin {reference}.{pin} appears in more than one net")]
    DuplicateMembership { reference: RefDes, pin: PinNum },
    #[error("pin {reference}.{pin} belongs to a component outside the finalized set")]
    DanglingComponentReference { reference: RefDes, pin: PinNum },
}

/// Finalization failure carrying every violation found
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("netlist validation failed with {} violation(s)", .violations.len())]
pub struct FinalizeError {
    pub violations: Vec<Violation>,
}
