use std::collections::HashMap;

/// Disjoint-set container over a fixed universe of labels.
///
/// Built fresh for every hull reduction and discarded afterwards; nothing is
/// shared between frames. Union relocates the whole absorbed group, which is
/// linear in its size; hull universes are tens of labels, so there is no
/// path compression.
#[derive(Debug)]
pub struct DisjointSet {
    groups: Vec<Option<Vec<usize>>>,
    member_lookup: HashMap<usize, usize>,
}

impl DisjointSet {
    /// Initialize with each distinct label in its own singleton group.
    pub fn new(labels: impl IntoIterator<Item = usize>) -> Self {
        let mut groups = Vec::new();
        let mut member_lookup = HashMap::new();
        for label in labels {
            if member_lookup.contains_key(&label) {
                continue;
            }
            member_lookup.insert(label, groups.len());
            groups.push(Some(vec![label]));
        }
        Self {
            groups,
            member_lookup,
        }
    }

    /// Index of the group currently holding `label`, or `None` if the label
    /// is not part of the universe.
    pub fn find(&self, label: usize) -> Option<usize> {
        self.member_lookup.get(&label).copied()
    }

    /// Merge the groups of two labels.
    ///
    /// The smaller-indexed group is absorbed into the other and its slot
    /// marked empty. A no-op if either label is unknown or both already share
    /// a group.
    pub fn union(&mut self, a: usize, b: usize) {
        let (Some(group_a), Some(group_b)) = (self.find(a), self.find(b)) else {
            return;
        };
        if group_a == group_b {
            return;
        }
        let (absorbed, target) = if group_a < group_b {
            (group_a, group_b)
        } else {
            (group_b, group_a)
        };
        let Some(members) = self.groups[absorbed].take() else {
            return;
        };
        for &member in &members {
            self.member_lookup.insert(member, target);
        }
        if let Some(group) = self.groups[target].as_mut() {
            group.extend(members);
        }
    }

    /// Snapshot of all non-empty groups, in slot order. Deterministic for a
    /// fixed construction and union sequence.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        self.groups.iter().flatten().cloned().collect()
    }
}
