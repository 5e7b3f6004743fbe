//! Incremental construction and validation of board netlists.
//!
//! A [`Session`] collects component declarations and connection statements,
//! unions overlapping statements into electrical nets, and checks the
//! result for completeness before handing out a read-only [`NetList`]
//! snapshot for downstream schematic/board export tooling.
//!
//! A pin belongs to at most one net; statements that touch pins of
//! existing nets merge those nets, so the final partition does not depend
//! on statement order. Pins that are intentionally left open must be
//! marked no-connect, and every other pin must end up in a net or
//! finalization fails with the full list of violations.
//!
//! ```
//! use netlist_builder::{Metadata, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! let u1 = session.declare("U1", 4, Metadata::new().with_value("SiT8008B"))?;
//! let c1 = session.declare("C1", 2, Metadata::new().with_value("100nF"))?;
//!
//! session.connect_named("VDD", &[u1.pin(4)?, c1.pin(1)?])?;
//! session.connect_named("GND", &[u1.pin(2)?, c1.pin(2)?])?;
//! session.connect(&[u1.pin(1)?, u1.pin(4)?])?;
//! session.mark_no_connect(u1.pin(3)?)?;
//!
//! let netlist = session.finalize(&[u1, c1])?;
//! assert_eq!(netlist.nets.len(), 2);
//! assert_eq!(netlist.net_named("VDD").unwrap().nodes.len(), 3);
//! # Ok(())
//! # }
//! ```

mod error;
mod net;
mod netlist;
mod registry;
mod validate;

pub use error::{BuildError, FinalizeError, Violation};
pub use netlist::{ComponentEntry, NetEntry, NetList, Node};
pub use registry::{ComponentHandle, Metadata, PinNum, PinRef, RefDes};

use std::collections::BTreeSet;

use net::NetBuilder;
use registry::Registry;

/// Pins explicitly declared as intentionally unconnected
#[derive(Default)]
struct NoConnectTracker {
    pins: BTreeSet<usize>,
}

impl NoConnectTracker {
    fn mark(&mut self, index: usize) {
        self.pins.insert(index);
    }

    fn contains(&self, index: usize) -> bool {
        self.pins.contains(&index)
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.pins.iter().copied()
    }
}

/// A single netlist construction session
///
/// All construction state is owned by the session value; independent
/// sessions share nothing. Declaration and connection errors fail the
/// offending statement immediately and leave the session unchanged;
/// completeness errors are deferred to [`Session::finalize`].
#[derive(Default)]
pub struct Session {
    registry: Registry,
    nets: NetBuilder,
    no_connect: NoConnectTracker,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a component with `pin_count` pins
    pub fn declare(
        &mut self,
        reference: impl Into<RefDes>,
        pin_count: u32,
        metadata: Metadata,
    ) -> Result<ComponentHandle, BuildError> {
        self.registry.declare(reference.into(), pin_count, metadata)
    }

    /// Connect pins into an anonymous net, merging any nets they already
    /// belong to
    pub fn connect(&mut self, pins: &[PinRef]) -> Result<(), BuildError> {
        self.connect_inner(pins, None)
    }

    /// Connect pins into a named net
    ///
    /// The merged net keeps the first name it was given; supplying a
    /// different name for the same net is an error.
    pub fn connect_named(&mut self, name: &str, pins: &[PinRef]) -> Result<(), BuildError> {
        self.connect_inner(pins, Some(name))
    }

    fn connect_inner(&mut self, pins: &[PinRef], name: Option<&str>) -> Result<(), BuildError> {
        for &pin in pins {
            if self.no_connect.contains(self.registry.pin_index(pin)) {
                let (reference, pin) = self.registry.pin_name(pin);
                return Err(BuildError::NoConnectViolation { reference, pin });
            }
        }
        let indices: Vec<usize> = pins.iter().map(|&pin| self.registry.pin_index(pin)).collect();
        self.nets.connect(&indices, name).map_err(|clash| {
            let (reference, pin) = self.registry.pin_name(self.registry.pin_at(clash.at));
            BuildError::NetNameConflict {
                existing: clash.existing,
                proposed: clash.proposed,
                reference,
                pin,
            }
        })
    }

    /// Mark a pin as intentionally unconnected
    pub fn mark_no_connect(&mut self, pin: PinRef) -> Result<(), BuildError> {
        let index = self.registry.pin_index(pin);
        if self.nets.contains(index) {
            let (reference, pin) = self.registry.pin_name(pin);
            return Err(BuildError::NoConnectViolation { reference, pin });
        }
        self.no_connect.mark(index);
        Ok(())
    }

    /// Validate the netlist over the given components and snapshot it
    ///
    /// Consumes the session. On failure the error carries every violation
    /// found, not just the first; no snapshot is produced.
    pub fn finalize(self, components: &[ComponentHandle]) -> Result<NetList, FinalizeError> {
        validate::finalize(self, components)
    }
}
