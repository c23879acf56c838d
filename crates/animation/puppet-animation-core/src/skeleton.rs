//! Skeleton topology index.
//!
//! Joints only store a `parent_id` back-reference. The index turns that into
//! an explicit parent -> children adjacency built once per snapshot, so
//! traversals are linear in the number of joints.

use hashbrown::{HashMap, HashSet};
use log::warn;

use crate::data::{Bone, Joint};
use crate::ids::JointId;

#[derive(Clone, Debug, Default)]
pub struct SkeletonIndex {
    /// Joint id -> position in the source joint list.
    slots: HashMap<JointId, usize>,
    /// Parent slot -> child slots in source order.
    children: Vec<Vec<usize>>,
    /// Slots of joints with no (existing) parent, in source order.
    roots: Vec<usize>,
    /// Depth-first order over all joints reachable from a root.
    dfs: Vec<usize>,
    /// Depth per slot, `None` for joints caught on a cycle.
    depth: Vec<Option<usize>>,
    ids: Vec<JointId>,
}

impl SkeletonIndex {
    pub fn build(joints: &[Joint]) -> Self {
        let mut slots: HashMap<JointId, usize> = HashMap::with_capacity(joints.len());
        for (i, j) in joints.iter().enumerate() {
            if slots.contains_key(j.id.as_str()) {
                warn!("duplicate joint id '{}' in skeleton; first entry wins", j.id);
                continue;
            }
            slots.insert(j.id.clone(), i);
        }

        let mut children = vec![Vec::new(); joints.len()];
        let mut roots = Vec::new();
        for (i, j) in joints.iter().enumerate() {
            match j.parent_id.as_ref() {
                Some(parent) => match slots.get(parent) {
                    Some(&p) if p != i => children[p].push(i),
                    Some(_) => {
                        warn!("joint '{}' is its own parent; treating as root", j.id);
                        roots.push(i);
                    }
                    None => {
                        warn!("joint '{}' has missing parent '{}'; treating as root", j.id, parent);
                        roots.push(i);
                    }
                },
                None => roots.push(i),
            }
        }

        let mut depth = vec![None; joints.len()];
        let mut dfs = Vec::with_capacity(joints.len());
        let mut stack: Vec<(usize, usize)> = roots.iter().rev().map(|&r| (r, 0)).collect();
        while let Some((slot, d)) = stack.pop() {
            if depth[slot].is_some() {
                continue;
            }
            depth[slot] = Some(d);
            dfs.push(slot);
            for &c in children[slot].iter().rev() {
                stack.push((c, d + 1));
            }
        }

        let index = Self {
            slots,
            children,
            roots,
            dfs,
            depth,
            ids: joints.iter().map(|j| j.id.clone()).collect(),
        };
        let cyclic = index.cyclic_joints();
        if !cyclic.is_empty() {
            warn!("{} joint(s) sit on a parent cycle and are unreachable", cyclic.len());
        }
        index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, joint: &str) -> bool {
        self.slots.contains_key(joint)
    }

    /// Position of the joint in the source list.
    pub fn slot(&self, joint: &str) -> Option<usize> {
        self.slots.get(joint).copied()
    }

    pub fn roots(&self) -> impl Iterator<Item = &JointId> {
        self.roots.iter().map(|&s| &self.ids[s])
    }

    pub fn children(&self, joint: &str) -> impl Iterator<Item = &JointId> {
        let slots: &[usize] = match self.slot(joint) {
            Some(s) => &self.children[s],
            None => &[],
        };
        slots.iter().map(|&s| &self.ids[s])
    }

    /// Joints in depth-first order (parents before children).
    pub fn depth_first(&self) -> impl Iterator<Item = &JointId> {
        self.dfs.iter().map(|&s| &self.ids[s])
    }

    /// Distance from the root, `None` for unknown or cyclic joints.
    pub fn depth(&self, joint: &str) -> Option<usize> {
        self.slot(joint).and_then(|s| self.depth[s])
    }

    /// Joints whose parent chain never reaches a root.
    pub fn cyclic_joints(&self) -> Vec<&JointId> {
        self.depth
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_none())
            .map(|(s, _)| &self.ids[s])
            .collect()
    }

    /// True if `ancestor` appears on the parent chain of `joint`.
    pub fn is_ancestor(&self, ancestor: &str, joint: &str) -> bool {
        let Some(target) = self.slot(ancestor) else {
            return false;
        };
        // Walk down from the ancestor; bounded by the number of joints.
        let mut seen: HashSet<usize> = HashSet::new();
        let mut stack = vec![target];
        while let Some(s) = stack.pop() {
            if !seen.insert(s) {
                continue;
            }
            for &c in &self.children[s] {
                if self.ids[c] == joint {
                    return true;
                }
                stack.push(c);
            }
        }
        false
    }

    /// Bones whose endpoints both exist. Dangling bones are skipped.
    pub fn valid_bones<'a>(&'a self, bones: &'a [Bone]) -> impl Iterator<Item = &'a Bone> + 'a {
        bones
            .iter()
            .filter(move |b| self.contains(b.start_joint_id.as_str()) && self.contains(b.end_joint_id.as_str()))
    }
}
