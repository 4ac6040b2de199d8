use crate::{pose::Pose, Scene, SceneError};

/// Everything a transform resolution needs: the scene, the time sample and the optional pose.
#[derive(Debug, Clone, Copy)]
pub struct SceneContext<'a> {
    pub scene: &'a Scene,
    pub time: f64,
    pub pose: Option<&'a Pose>,
}

impl<'a> SceneContext<'a> {
    pub fn new(scene: &'a Scene, time: f64, pose_index: Option<usize>) -> Result<Self, SceneError> {
        if !time.is_finite() {
            return Err(SceneError::InvalidTime(time));
        }

        let pose = match pose_index {
            Some(index) => Some(scene.poses.get(index).ok_or(SceneError::PoseIndex {
                index,
                count: scene.poses.len(),
            })?),
            None => None,
        };

        Ok(Self { scene, time, pose })
    }

    /// Context without a pose, transforms are evaluated from the hierarchy.
    pub fn at_time(scene: &'a Scene, time: f64) -> Self {
        Self {
            scene,
            time,
            pose: None,
        }
    }
}
