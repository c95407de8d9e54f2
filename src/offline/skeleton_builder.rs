//! Builds runtime skeletons from offline hierarchies.

use tracing::debug;

use super::raw_skeleton::{Joint, RawSkeleton};
use crate::animation::{JointProperties, Skeleton, NO_PARENT};
use crate::math::{normalize_safe, SoaTransform, Transform};
use crate::util::Result;

/// Converts a [`RawSkeleton`] to a runtime [`Skeleton`].
///
/// Joints are listed depth-first, so every parent precedes its children.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkeletonBuilder;

impl SkeletonBuilder {
    pub fn build(&self, raw: &RawSkeleton) -> Result<Skeleton> {
        raw.validate()?;

        // (joint, parent index) in traversal order.
        let mut linear: Vec<(&Joint, u16)> = Vec::with_capacity(raw.num_joints());
        for (joint, parent) in raw.iter_depth_first() {
            let parent_index = match parent {
                // Parents are listed before children, search from the back.
                Some(parent) => linear
                    .iter()
                    .rposition(|(j, _)| std::ptr::eq(*j, parent))
                    .map_or(NO_PARENT, |i| i as u16),
                None => NO_PARENT,
            };
            linear.push((joint, parent_index));
        }

        let joint_properties = linear
            .iter()
            .map(|(joint, parent)| JointProperties::new(*parent, joint.children.is_empty()))
            .collect();
        let joint_names = linear.iter().map(|(joint, _)| joint.name.clone()).collect();
        let bind_pose = linear
            .chunks(4)
            .map(|chunk| {
                let mut transforms = [Transform::IDENTITY; 4];
                for (dst, (joint, _)) in transforms.iter_mut().zip(chunk) {
                    *dst = Transform {
                        rotation: normalize_safe(joint.transform.rotation),
                        ..joint.transform
                    };
                }
                SoaTransform::from_transforms(transforms)
            })
            .collect();

        debug!("Built skeleton with {} joints.", linear.len());
        Ok(Skeleton::from_parts(joint_properties, bind_pose, joint_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::MAX_JOINTS;
    use crate::util::Error;
    use crate::math::{Quat, Vec3};

    #[test]
    fn test_empty() {
        let skeleton = SkeletonBuilder.build(&RawSkeleton::default()).unwrap();
        assert_eq!(skeleton.num_joints(), 0);
        assert_eq!(skeleton.num_soa_joints(), 0);
    }

    #[test]
    fn test_too_many_joints() {
        let roots = (0..=MAX_JOINTS)
            .map(|i| Joint::new(format!("j{i}"), Transform::IDENTITY))
            .collect();
        assert!(SkeletonBuilder.build(&RawSkeleton::new(roots)).is_err());
    }

    #[test]
    fn test_nul_in_joint_name() {
        let t = Transform::IDENTITY;
        let raw = RawSkeleton::new(vec![Joint::new("ro\0ot", t).with_child(Joint::new("j0", t))]);
        assert!(matches!(SkeletonBuilder.build(&raw), Err(Error::InvalidRaw(_))));
    }

    #[test]
    fn test_hierarchy() {
        let t = Transform::IDENTITY;
        let raw = RawSkeleton::new(vec![Joint::new("root", t)
            .with_child(Joint::new("j0", t).with_child(Joint::new("j1", t)))
            .with_child(Joint::new("j2", t))]);
        let skeleton = SkeletonBuilder.build(&raw).unwrap();

        assert_eq!(skeleton.num_joints(), 4);
        assert_eq!(skeleton.joint_names(), &["root", "j0", "j1", "j2"]);
        let properties = skeleton.joint_properties();
        assert_eq!(properties[0], JointProperties::new(NO_PARENT, false));
        assert_eq!(properties[1], JointProperties::new(0, false));
        assert_eq!(properties[2], JointProperties::new(1, true));
        assert_eq!(properties[3], JointProperties::new(0, true));
    }

    #[test]
    fn test_bind_pose() {
        let raw = RawSkeleton::new(vec![
            Joint::new("a", Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))),
            Joint::new("b", Transform::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0), Vec3::splat(2.0))),
            Joint::new("c", Transform::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), Vec3::ONE)),
            Joint::new("d", Transform::IDENTITY),
            Joint::new("e", Transform::from_translation(Vec3::X)),
        ]);
        let skeleton = SkeletonBuilder.build(&raw).unwrap();
        assert_eq!(skeleton.num_soa_joints(), 2);

        let bind_pose = skeleton.bind_pose();
        assert_eq!(bind_pose[0].lane(0).translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bind_pose[0].lane(1).rotation, Quat::IDENTITY);
        assert_eq!(bind_pose[0].lane(1).scale, Vec3::splat(2.0));
        assert_eq!(bind_pose[0].lane(2).rotation, Quat::IDENTITY);
        assert_eq!(bind_pose[1].lane(0).translation, Vec3::X);
        // Padding lanes are identity.
        for lane in 1..4 {
            assert_eq!(bind_pose[1].lane(lane), Transform::IDENTITY);
        }
    }
}
