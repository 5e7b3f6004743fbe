use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// A component reference designator ("U1", "C3")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefDes(pub String);

impl Display for RefDes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RefDes {
    fn from(value: &str) -> Self {
        RefDes(value.to_owned())
    }
}

impl From<String> for RefDes {
    fn from(value: String) -> Self {
        RefDes(value)
    }
}

/// A 1-based pin number within a component footprint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PinNum(pub u32);

impl Display for PinNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Interned index of a declared component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ComponentId(pub(crate) u32);

/// A single pin, addressed by interned component and pin number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinRef {
    pub(crate) component: ComponentId,
    pub(crate) num: PinNum,
}

/// Static descriptive component fields, carried through to the snapshot
/// untouched. None of these affect validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub value: Option<String>,
    pub footprint: Option<String>,
    pub description: Option<String>,
    pub datasheet: Option<String>,
    pub mpn: Option<String>,
    pub symbol: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_footprint(mut self, footprint: impl Into<String>) -> Self {
        self.footprint = Some(footprint.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_datasheet(mut self, datasheet: impl Into<String>) -> Self {
        self.datasheet = Some(datasheet.into());
        self
    }

    pub fn with_mpn(mut self, mpn: impl Into<String>) -> Self {
        self.mpn = Some(mpn.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// Handle to a declared component
///
/// Carries the declared pin count so pin references can be range-checked
/// without going back to the session.
#[derive(Debug, Clone)]
pub struct ComponentHandle {
    pub(crate) id: ComponentId,
    pub(crate) ref_des: RefDes,
    pub(crate) pin_count: u32,
}

impl ComponentHandle {
    /// Address a pin of this component
    pub fn pin(&self, num: u32) -> Result<PinRef, BuildError> {
        if num == 0 || num > self.pin_count {
            return Err(BuildError::InvalidPinNumber {
                reference: self.ref_des.clone(),
                pin: PinNum(num),
                pin_count: self.pin_count,
            });
        }
        Ok(PinRef {
            component: self.id,
            num: PinNum(num),
        })
    }

    pub fn reference(&self) -> &RefDes {
        &self.ref_des
    }

    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }
}

pub(crate) struct ComponentRecord {
    pub(crate) ref_des: RefDes,
    pub(crate) pin_count: u32,
    pub(crate) pin_base: usize,
    pub(crate) metadata: Metadata,
}

/// Source of truth for declared components and their pin ranges
///
/// Each component owns a contiguous block of the global pin index space,
/// starting at its `pin_base`. Those dense indices are what the net builder
/// and no-connect tracker operate on.
#[derive(Default)]
pub(crate) struct Registry {
    components: Vec<ComponentRecord>,
    by_ref: HashMap<RefDes, ComponentId>,
    pin_owner: Vec<ComponentId>,
}

impl Registry {
    pub(crate) fn declare(
        &mut self,
        reference: RefDes,
        pin_count: u32,
        metadata: Metadata,
    ) -> Result<ComponentHandle, BuildError> {
        if pin_count == 0 {
            return Err(BuildError::EmptyFootprint(reference));
        }
        if self.by_ref.contains_key(&reference) {
            return Err(BuildError::DuplicateReference(reference));
        }
        let id = ComponentId(self.components.len() as u32);
        let pin_base = self.pin_owner.len();
        self.pin_owner
            .extend(std::iter::repeat(id).take(pin_count as usize));
        self.by_ref.insert(reference.clone(), id);
        self.components.push(ComponentRecord {
            ref_des: reference.clone(),
            pin_count,
            pin_base,
            metadata,
        });
        Ok(ComponentHandle {
            id,
            ref_des: reference,
            pin_count,
        })
    }

    pub(crate) fn record(&self, id: ComponentId) -> &ComponentRecord {
        &self.components[id.0 as usize]
    }

    /// Dense index of a pin in the global pin space
    pub(crate) fn pin_index(&self, pin: PinRef) -> usize {
        self.record(pin.component).pin_base + (pin.num.0 - 1) as usize
    }

    /// Inverse of [`Registry::pin_index`]
    pub(crate) fn pin_at(&self, index: usize) -> PinRef {
        let id = self.pin_owner[index];
        let base = self.record(id).pin_base;
        PinRef {
            component: id,
            num: PinNum((index - base) as u32 + 1),
        }
    }

    /// Reference designator and pin number for error reporting
    pub(crate) fn pin_name(&self, pin: PinRef) -> (RefDes, PinNum) {
        (self.record(pin.component).ref_des.clone(), pin.num)
    }
}
