//! Offline skeleton hierarchy.

use std::collections::VecDeque;

use crate::animation::MAX_JOINTS;
use crate::io::{Archivable, IArchive, OArchive};
use crate::math::Transform;
use crate::util::{Error, Result};

/// Joint of a [`RawSkeleton`] hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Joint {
    pub name: String,
    /// Transform relative to the parent joint.
    pub transform: Transform,
    pub children: Vec<Joint>,
}

impl Joint {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    /// Builder style child insertion.
    pub fn with_child(mut self, child: Joint) -> Self {
        self.children.push(child);
        self
    }
}

/// Offline skeleton: a forest of named joints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSkeleton {
    pub roots: Vec<Joint>,
}

impl RawSkeleton {
    pub fn new(roots: Vec<Joint>) -> Self {
        Self { roots }
    }

    /// Total number of joints in the hierarchy.
    pub fn num_joints(&self) -> usize {
        self.iter_depth_first().count()
    }

    /// Checks the skeleton can be built.
    pub fn validate(&self) -> Result<()> {
        let num_joints = self.num_joints();
        if num_joints > MAX_JOINTS {
            return Err(Error::invalid_raw(format!(
                "skeleton has {num_joints} joints, maximum is {MAX_JOINTS}"
            )));
        }
        // Names are stored NUL separated.
        if let Some((joint, _)) = self.iter_depth_first().find(|(j, _)| j.name.contains('\0')) {
            return Err(Error::invalid_raw(format!(
                "joint name {:?} contains a NUL character",
                joint.name
            )));
        }
        Ok(())
    }

    /// Visits joints in depth-first pre-order, yielding `(joint, parent)`.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: self.roots.iter().rev().map(|j| (j, None)).collect(),
        }
    }

    /// Visits joints level by level, yielding `(joint, parent)`.
    pub fn iter_breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            queue: self.roots.iter().map(|j| (j, None)).collect(),
        }
    }
}

/// Depth-first joint iterator, see [`RawSkeleton::iter_depth_first`].
pub struct DepthFirst<'a> {
    stack: Vec<(&'a Joint, Option<&'a Joint>)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (&'a Joint, Option<&'a Joint>);

    fn next(&mut self) -> Option<Self::Item> {
        let (joint, parent) = self.stack.pop()?;
        self.stack.extend(joint.children.iter().rev().map(|c| (c, Some(joint))));
        Some((joint, parent))
    }
}

/// Breadth-first joint iterator, see [`RawSkeleton::iter_breadth_first`].
pub struct BreadthFirst<'a> {
    queue: VecDeque<(&'a Joint, Option<&'a Joint>)>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (&'a Joint, Option<&'a Joint>);

    fn next(&mut self) -> Option<Self::Item> {
        let (joint, parent) = self.queue.pop_front()?;
        self.queue.extend(joint.children.iter().map(|c| (c, Some(joint))));
        Some((joint, parent))
    }
}

impl Archivable for Joint {
    const VERSION: u32 = 1;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for joint in values {
            archive.write(&joint.name);
            archive.write(&joint.transform);
            archive.write(&joint.children);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for joint in values {
            archive.read_into(&mut joint.name);
            archive.read_into(&mut joint.transform);
            archive.read_into(&mut joint.children);
        }
    }
}

impl Archivable for RawSkeleton {
    const VERSION: u32 = 1;
    const TAG: Option<&'static [u8]> = Some(b"ozz-raw_skeleton\0");

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for skeleton in values {
            archive.write(&skeleton.roots);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for skeleton in values {
            archive.read_into(&mut skeleton.roots);
        }
    }
}
