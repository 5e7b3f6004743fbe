use std::collections::HashMap;

use log::trace;

mod union;

use union::UnionFind;

/// Name clash detected while unioning a statement's pins
///
/// `at` is the dense index of the pin whose prior net carried the losing
/// name; the session maps it back to a component reference for reporting.
#[derive(Debug)]
pub(crate) struct NameClash {
    pub(crate) existing: String,
    pub(crate) proposed: String,
    pub(crate) at: usize,
}

/// Incrementally unions pins into nets as connection statements are issued
///
/// Works purely on dense pin indices handed out by the registry. A pin is
/// "in a net" once it has appeared in any connect statement; net names are
/// tracked per union-find root and follow the class across merges.
#[derive(Default)]
pub(crate) struct NetBuilder {
    uf: UnionFind,
    in_net: Vec<bool>,
    names: HashMap<usize, String>,
}

impl NetBuilder {
    fn ensure(&mut self, index: usize) {
        self.uf.ensure(index);
        if self.in_net.len() <= index {
            self.in_net.resize(index + 1, false);
        }
    }

    /// Whether the pin belongs to any net
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.in_net.get(index).copied().unwrap_or(false)
    }

    /// Union all `pins` (and the nets they already belong to) into one net,
    /// optionally naming it.
    ///
    /// The merged net keeps the name it acquired first; a second, different
    /// name is a clash. All checks run before any state is touched, so a
    /// failed statement leaves the builder unchanged.
    pub(crate) fn connect(&mut self, pins: &[usize], name: Option<&str>) -> Result<(), NameClash> {
        if pins.is_empty() {
            return Ok(());
        }
        for &pin in pins {
            self.ensure(pin);
        }

        // Resolve the merged net's name up front: the first name among the
        // classes being merged wins, and every other name must agree.
        let mut resolved: Option<(String, usize)> = None;
        for &pin in pins {
            if !self.in_net[pin] {
                continue;
            }
            let root = self.uf.find(pin);
            let Some(existing) = self.names.get(&root) else {
                continue;
            };
            match &resolved {
                None => resolved = Some((existing.clone(), pin)),
                Some((first, _)) if first == existing => {}
                Some((first, _)) => {
                    return Err(NameClash {
                        existing: first.clone(),
                        proposed: existing.clone(),
                        at: pin,
                    })
                }
            }
        }
        if let Some(name) = name {
            match &resolved {
                Some((first, at)) if first != name => {
                    return Err(NameClash {
                        existing: first.clone(),
                        proposed: name.to_owned(),
                        at: *at,
                    });
                }
                Some(_) => {}
                None => resolved = Some((name.to_owned(), pins[0])),
            }
        }

        let mut root = self.uf.find(pins[0]);
        self.names.remove(&root);
        for &pin in &pins[1..] {
            let other = self.uf.find(pin);
            if other != root {
                self.names.remove(&other);
                root = self.uf.union(root, other);
            }
        }
        for &pin in pins {
            self.in_net[pin] = true;
        }
        if let Some((name, _)) = resolved {
            self.names.insert(root, name);
        }
        trace!("connected {} pin(s) into net class {root}", pins.len());
        Ok(())
    }

    /// All pins that belong to any net
    pub(crate) fn connected(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.in_net.len()).filter(|&index| self.in_net[index])
    }

    /// Materialize the final partition as (name, members) groups
    pub(crate) fn classes(&mut self) -> Vec<(Option<String>, Vec<usize>)> {
        let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
        for index in 0..self.in_net.len() {
            if self.in_net[index] {
                let root = self.uf.find(index);
                by_root.entry(root).or_default().push(index);
            }
        }
        by_root
            .into_iter()
            .map(|(root, members)| (self.names.get(&root).cloned(), members))
            .collect()
    }
}
