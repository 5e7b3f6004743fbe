use std::collections::HashSet;

use log::debug;

use crate::error::{FinalizeError, Violation};
use crate::netlist::{ComponentEntry, NetEntry, NetList, Node};
use crate::registry::{ComponentId, PinNum, PinRef, RefDes};
use crate::{ComponentHandle, Session};

/// Run the consistency checks over the given component set and, if every
/// pin is accounted for, materialize the snapshot.
///
/// Violations are collected exhaustively and reported in check order:
/// completeness, net membership, reference integrity. Any violation means
/// no snapshot is produced.
pub(crate) fn finalize(
    mut session: Session,
    components: &[ComponentHandle],
) -> Result<NetList, FinalizeError> {
    let mut included: Vec<&ComponentHandle> = Vec::new();
    let mut included_ids: HashSet<ComponentId> = HashSet::new();
    for handle in components {
        if included_ids.insert(handle.id) {
            included.push(handle);
        }
    }

    let mut violations = Vec::new();

    // every declared pin must be in a net or marked no-connect
    let mut floating: Vec<(RefDes, PinNum)> = Vec::new();
    for handle in &included {
        for num in 1..=handle.pin_count {
            let pin = PinRef {
                component: handle.id,
                num: PinNum(num),
            };
            let index = session.registry.pin_index(pin);
            if !session.nets.contains(index) && !session.no_connect.contains(index) {
                floating.push((handle.ref_des.clone(), PinNum(num)));
            }
        }
    }
    floating.sort();
    violations.extend(
        floating
            .into_iter()
            .map(|(reference, pin)| Violation::FloatingPin { reference, pin }),
    );

    // single-net membership holds by construction; re-checked while the
    // final partition is materialized
    let classes = session.nets.classes();
    let mut seen_pins: HashSet<usize> = HashSet::new();
    let mut duplicates: Vec<(RefDes, PinNum)> = Vec::new();
    for (_, members) in &classes {
        for &member in members {
            if !seen_pins.insert(member) {
                duplicates.push(session.registry.pin_name(session.registry.pin_at(member)));
            }
        }
    }
    duplicates.sort();
    violations.extend(
        duplicates
            .into_iter()
            .map(|(reference, pin)| Violation::DuplicateMembership { reference, pin }),
    );

    // every pin referenced by a net or no-connect statement must belong to
    // a component in the finalization set
    let mut dangling: Vec<(RefDes, PinNum)> = Vec::new();
    for index in session.nets.connected().chain(session.no_connect.iter()) {
        let pin = session.registry.pin_at(index);
        if !included_ids.contains(&pin.component) {
            dangling.push(session.registry.pin_name(pin));
        }
    }
    dangling.sort();
    violations.extend(
        dangling
            .into_iter()
            .map(|(reference, pin)| Violation::DanglingComponentReference { reference, pin }),
    );

    if !violations.is_empty() {
        debug!("netlist validation failed with {} violation(s)", violations.len());
        return Err(FinalizeError { violations });
    }

    let mut entries: Vec<ComponentEntry> = included
        .iter()
        .map(|handle| {
            let record = session.registry.record(handle.id);
            ComponentEntry {
                reference: record.ref_des.clone(),
                pin_count: record.pin_count,
                metadata: record.metadata.clone(),
            }
        })
        .collect();
    entries.sort_by(|a, b| a.reference.cmp(&b.reference));

    let mut nets: Vec<NetEntry> = classes
        .into_iter()
        .map(|(name, members)| {
            let mut nodes: Vec<Node> = members
                .into_iter()
                .map(|index| {
                    let (reference, pin) = session.registry.pin_name(session.registry.pin_at(index));
                    Node { reference, pin }
                })
                .collect();
            nodes.sort();
            NetEntry { name, nodes }
        })
        .collect();
    nets.sort_by(|a, b| {
        (a.name.is_none(), &a.name, &a.nodes).cmp(&(b.name.is_none(), &b.name, &b.nodes))
    });

    let mut no_connects: Vec<Node> = session
        .no_connect
        .iter()
        .map(|index| {
            let (reference, pin) = session.registry.pin_name(session.registry.pin_at(index));
            Node { reference, pin }
        })
        .collect();
    no_connects.sort();

    debug!(
        "finalized netlist: {} component(s), {} net(s), {} no-connect(s)",
        entries.len(),
        nets.len(),
        no_connects.len()
    );
    Ok(NetList {
        components: entries,
        nets,
        no_connects,
    })
}
