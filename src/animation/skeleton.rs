//! Runtime skeleton.
//!
//! Joints are stored in a flat array sorted so that parents always come
//! before their children. Bind poses are packed four joints per
//! [`SoaTransform`].

use tracing::error;

use crate::io::{Archivable, IArchive, OArchive};
use crate::math::SoaTransform;

/// Number of bits used to encode a joint index.
pub const MAX_JOINTS_NUM_BITS: u32 = 10;

/// Maximum number of joints in a skeleton.
pub const MAX_JOINTS: usize = (1 << MAX_JOINTS_NUM_BITS) - 1;

/// Maximum number of SoA elements in a skeleton.
pub const MAX_SOA_JOINTS: usize = MAX_JOINTS.div_ceil(4);

/// Parent index of root joints.
pub const NO_PARENT: u16 = ((1 << MAX_JOINTS_NUM_BITS) - 1) as u16;

const PARENT_MASK: u16 = (1 << MAX_JOINTS_NUM_BITS) - 1;
const LEAF_BIT: u16 = 1 << MAX_JOINTS_NUM_BITS;

/// Per joint hierarchy information.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointProperties {
    /// Parent joint index, [`NO_PARENT`] for roots.
    pub parent: u16,
    /// True if the joint has no child.
    pub is_leaf: bool,
}

impl JointProperties {
    #[inline]
    pub const fn new(parent: u16, is_leaf: bool) -> Self {
        Self { parent, is_leaf }
    }

    #[inline]
    pub const fn is_root(&self) -> bool {
        self.parent == NO_PARENT
    }

    /// Packs into the 2 bytes wire layout: parent in bits 0..10, leaf flag in bit 10.
    #[inline]
    pub const fn pack(self) -> u16 {
        (self.parent & PARENT_MASK) | if self.is_leaf { LEAF_BIT } else { 0 }
    }

    #[inline]
    pub const fn unpack(bits: u16) -> Self {
        Self {
            parent: bits & PARENT_MASK,
            is_leaf: bits & LEAF_BIT != 0,
        }
    }
}

impl Default for JointProperties {
    fn default() -> Self {
        Self::new(NO_PARENT, true)
    }
}

impl Archivable for JointProperties {
    const VERSION: u32 = 2;

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for properties in values {
            archive.write_primitive(properties.pack());
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], _version: u32) {
        for properties in values {
            *properties = Self::unpack(archive.read_primitive());
        }
    }
}

/// Runtime skeleton, built from a `RawSkeleton` or loaded from an archive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    joint_properties: Vec<JointProperties>,
    bind_pose: Vec<SoaTransform>,
    joint_names: Vec<String>,
}

impl Skeleton {
    pub(crate) fn from_parts(
        joint_properties: Vec<JointProperties>,
        bind_pose: Vec<SoaTransform>,
        joint_names: Vec<String>,
    ) -> Self {
        debug_assert_eq!(joint_properties.len(), joint_names.len());
        debug_assert_eq!(bind_pose.len(), joint_properties.len().div_ceil(4));
        Self {
            joint_properties,
            bind_pose,
            joint_names,
        }
    }

    #[inline]
    pub fn num_joints(&self) -> usize {
        self.joint_properties.len()
    }

    /// Number of SoA elements needed to store one value per joint.
    #[inline]
    pub fn num_soa_joints(&self) -> usize {
        self.num_joints().div_ceil(4)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joint_properties.is_empty()
    }

    #[inline]
    pub fn joint_properties(&self) -> &[JointProperties] {
        &self.joint_properties
    }

    #[inline]
    pub fn bind_pose(&self) -> &[SoaTransform] {
        &self.bind_pose
    }

    #[inline]
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    /// Index of the first joint named `name`.
    pub fn find_joint(&self, name: &str) -> Option<usize> {
        self.joint_names.iter().position(|n| n == name)
    }

    /// Parent index of `joint`, `None` for roots.
    pub fn parent(&self, joint: usize) -> Option<usize> {
        let properties = self.joint_properties.get(joint)?;
        (!properties.is_root()).then_some(properties.parent as usize)
    }
}

impl Archivable for Skeleton {
    const VERSION: u32 = 2;
    const TAG: Option<&'static [u8]> = Some(b"ozz-skeleton\0");

    fn save(archive: &mut OArchive<'_>, values: &[Self]) {
        for skeleton in values {
            let num_joints = skeleton.num_joints();
            archive.write_primitive(num_joints as i32);
            if num_joints == 0 {
                continue;
            }

            // Names are concatenated, each one NUL terminated.
            let mut chars = Vec::with_capacity(skeleton.joint_names.iter().map(|n| n.len() + 1).sum());
            for name in &skeleton.joint_names {
                chars.extend_from_slice(name.as_bytes());
                chars.push(0);
            }
            archive.write_primitive(chars.len() as i32);
            archive.write_primitives(&chars);

            archive.write_array(&skeleton.joint_properties);
            archive.write_array(&skeleton.bind_pose);
        }
    }

    fn load(archive: &mut IArchive<'_>, values: &mut [Self], version: u32) {
        values.fill_with(Self::default);
        if version != Self::VERSION {
            error!("Unsupported Skeleton version {version}.");
            return;
        }

        for skeleton in values {
            let num_joints = archive.read_primitive::<i32>().max(0) as usize;
            if num_joints == 0 {
                continue;
            }
            if num_joints > MAX_JOINTS {
                error!("Skeleton joint count {num_joints} exceeds the maximum of {MAX_JOINTS}.");
                return;
            }

            let chars_count = archive.read_primitive::<i32>().max(0) as usize;
            let chars: Vec<u8> = archive.read_vec(chars_count);
            let mut joint_names: Vec<String> = chars
                .split(|&c| c == 0)
                .take(num_joints)
                .map(|name| String::from_utf8_lossy(name).into_owned())
                .collect();
            joint_names.resize_with(num_joints, String::new);

            let joint_properties: Vec<JointProperties> = archive.read_vec(num_joints);
            let bind_pose: Vec<SoaTransform> = archive.read_vec(num_joints.div_ceil(4));
            if chars.len() < chars_count
                || joint_properties.len() < num_joints
                || bind_pose.len() < num_joints.div_ceil(4)
            {
                error!("Skeleton archive ends before its {num_joints} joints.");
                return;
            }

            *skeleton = Self {
                joint_properties,
                bind_pose,
                joint_names,
            };
        }
    }
}
