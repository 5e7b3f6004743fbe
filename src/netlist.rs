use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::registry::{Metadata, PinNum, RefDes};

/// A node connects a net to a pin
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Node {
    pub reference: RefDes,
    pub pin: PinNum,
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.reference, self.pin)
    }
}

/// A declared component as it appears in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub reference: RefDes,
    pub pin_count: u32,
    pub metadata: Metadata,
}

/// An electrical net: a set of pins held at the same potential
///
/// Nets built purely from anonymous statements stay nameless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetEntry {
    pub name: Option<String>,
    pub nodes: Vec<Node>,
}

/// Validated, read-only netlist snapshot
///
/// This is the full output surface of the engine; export tooling consumes
/// it and the engine knows nothing about downstream file formats. All lists
/// are sorted, so snapshots are comparable regardless of the order the
/// construction statements were issued in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetList {
    pub components: Vec<ComponentEntry>,
    pub nets: Vec<NetEntry>,
    pub no_connects: Vec<Node>,
}

impl NetList {
    /// The net carrying the given name, if any
    pub fn net_named(&self, name: &str) -> Option<&NetEntry> {
        self.nets.iter().find(|net| net.name.as_deref() == Some(name))
    }

    /// The net containing the given pin, if any
    pub fn net_of(&self, reference: &str, pin: u32) -> Option<&NetEntry> {
        self.nets.iter().find(|net| {
            net.nodes
                .iter()
                .any(|node| node.reference.0 == reference && node.pin.0 == pin)
        })
    }

    pub fn is_no_connect(&self, reference: &str, pin: u32) -> bool {
        self.no_connects
            .iter()
            .any(|node| node.reference.0 == reference && node.pin.0 == pin)
    }

    /// Serialize to pretty JSON for downstream tooling
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(reference: &str, pin: u32) -> Node {
        Node {
            reference: reference.into(),
            pin: PinNum(pin),
        }
    }

    fn sample() -> NetList {
        NetList {
            components: vec![ComponentEntry {
                reference: "R1".into(),
                pin_count: 2,
                metadata: Metadata::new().with_value("10k"),
            }],
            nets: vec![
                NetEntry {
                    name: Some("GND".to_owned()),
                    nodes: vec![node("R1", 2)],
                },
                NetEntry {
                    name: None,
                    nodes: vec![node("R1", 1)],
                },
            ],
            no_connects: vec![],
        }
    }

    #[test]
    fn lookup_by_name_and_pin() {
        let netlist = sample();
        assert_eq!(netlist.net_named("GND").unwrap().nodes, vec![node("R1", 2)]);
        assert!(netlist.net_named("VCC").is_none());
        assert!(netlist.net_of("R1", 1).unwrap().name.is_none());
        assert!(netlist.net_of("R1", 3).is_none());
        assert!(!netlist.is_no_connect("R1", 1));
    }

    #[test]
    fn json_roundtrip() {
        let netlist = sample();
        let json = netlist.to_json().unwrap();
        let back: NetList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, netlist);
    }
}
