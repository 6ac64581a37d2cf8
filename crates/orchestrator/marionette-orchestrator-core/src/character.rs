//! Per-frame pose assembly.
//!
//! One [`Character::advance`] call runs the whole pipeline:
//! motion blend -> skeleton (rest + pose channels, FK) -> leg IK -> hand IK
//! -> physics chains -> [`Frame`]. Nothing in it is fatal; channels naming
//! bones the rig does not have are skipped and listed in `Frame::missing`.

use std::sync::Arc;

use marionette_animation_core::{AnimationClip, ClipPlayback, LipSyncTrack, LoopMode};
use marionette_api_core::pose::Channel;
use marionette_api_core::{Pose, Value, Vec2};
use marionette_motion_core::{
    Gesture, GestureGenerator, LayerId, Locomotion, LocomotionState, MotionBlender, MotionPreset,
    TriggerOutcome,
};
use marionette_rig_core::{
    solve_legs, HumanoidRig, LegIkConfig, LegTarget, PhysicsChain, RigError, Side, Skeleton,
};

use crate::config::{ConfigError, RigConfig};

const HAND_EFFECTORS: [&str; 2] = ["hand_l", "hand_r"];

#[derive(Clone, Debug, PartialEq)]
pub struct BoneSegment {
    pub name: String,
    pub start: Vec2,
    pub end: Vec2,
    /// World rotation, radians.
    pub rotation: f32,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Character clock at this frame, seconds.
    pub time: f32,
    /// Bones in skeleton order (parents before children).
    pub bones: Vec<BoneSegment>,
    /// Node positions of each physics chain, anchor end first.
    pub chains: Vec<Vec<Vec2>>,
    /// Per-node displacement of each chain from its hanging rest shape.
    pub chain_offsets: Vec<Vec<Vec2>>,
    /// Free properties: mouth shape, jaw opening, clip-driven values.
    pub properties: Pose,
    /// Pixels per head unit.
    pub unit: f32,
    pub view_angle: f32,
    pub pelvis_drop: f32,
    /// Bones named by this frame's channels that the rig does not have.
    pub missing: Vec<String>,
}

impl Frame {
    pub fn bone(&self, name: &str) -> Option<&BoneSegment> {
        self.bones.iter().find(|b| b.name == name)
    }

    pub fn mouth(&self) -> Option<&str> {
        self.properties.get("mouth").and_then(Value::as_text)
    }
}

pub struct Character {
    config: RigConfig,
    rig: HumanoidRig,
    leg_ik: LegIkConfig,
    blender: MotionBlender,
    locomotion: Locomotion,
    gestures: GestureGenerator,
    talking: Option<LayerId>,
    clips: Vec<ClipPlayback>,
    hair: Option<PhysicsChain>,
    time: f32,
    frame: u64,
}

impl Character {
    pub fn new(config: RigConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let proportions = config.proportions.viewed_at(config.view_angle);
        let rig = HumanoidRig::build(&proportions, config.head_px(), config.origin())?;
        let leg_ik = LegIkConfig {
            ground_y: rig.ground_y(),
            ..config.leg_ik
        };

        let mut blender = MotionBlender::new();
        let locomotion = Locomotion::new(&mut blender, config.walk, config.run);
        if config.breathing {
            blender.add(MotionPreset::breathing(), 1.0);
        }
        let hair = (config.hair_segments > 0).then(|| {
            let crown = rig.rest_end("head").unwrap_or(rig.skeleton.origin());
            PhysicsChain::new(crown, config.hair_segments, config.hair.clone())
        });
        log::debug!(
            "character: {} bones, {:.2} px per head unit",
            rig.skeleton.len(),
            rig.unit()
        );

        Ok(Self {
            gestures: GestureGenerator::new(config.gesture_policy),
            config,
            rig,
            leg_ik,
            blender,
            locomotion,
            talking: None,
            clips: Vec::new(),
            hair,
            time: 0.0,
            frame: 0,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::new(RigConfig::from_json_str(json)?)
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn rig(&self) -> &HumanoidRig {
        &self.rig
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.rig.skeleton
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn blender(&self) -> &MotionBlender {
        &self.blender
    }

    pub fn blender_mut(&mut self) -> &mut MotionBlender {
        &mut self.blender
    }

    pub fn locomotion(&self) -> LocomotionState {
        self.locomotion.state()
    }

    pub fn set_locomotion(&mut self, state: LocomotionState, fade: f32) {
        self.locomotion.set_state(&mut self.blender, state, fade);
    }

    pub fn gestures(&self) -> &GestureGenerator {
        &self.gestures
    }

    pub fn trigger_gesture(&mut self, gesture: Gesture) -> TriggerOutcome {
        self.gestures.trigger(&mut self.blender, gesture)
    }

    /// Trigger the gesture matching `text`, if any keyword matches.
    pub fn react_to_phrase(&mut self, text: &str) -> Option<TriggerOutcome> {
        let gesture = GestureGenerator::select_for_phrase(text)?;
        Some(self.trigger_gesture(gesture))
    }

    /// Start talking. Cue times are read on the character clock, so pass a
    /// track aligned with it. `None` talks without cues.
    pub fn start_talking(&mut self, cues: Option<Arc<LipSyncTrack>>) {
        self.stop_talking();
        self.talking = Some(self.blender.add(MotionPreset::talking(cues), 1.0));
    }

    pub fn stop_talking(&mut self) {
        if let Some(id) = self.talking.take() {
            self.blender.remove(id);
        }
    }

    /// Play a clip from the current frame on. Its channels override the
    /// procedural ones with the same key.
    pub fn play_clip(&mut self, clip: Arc<AnimationClip>, mode: LoopMode) {
        self.clips.push(ClipPlayback::new(clip, mode));
    }

    pub fn clear_clips(&mut self) {
        self.clips.clear();
    }

    pub fn set_wind(&mut self, wind: Vec2) {
        if let Some(hair) = &mut self.hair {
            hair.set_wind(wind);
        }
    }

    /// Advance every source by `dt` seconds and assemble the next frame.
    pub fn advance(&mut self, dt: f32) -> Frame {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("character: ignoring invalid dt {dt}");
            0.0
        };
        self.time += dt;
        self.blender.advance(dt);
        self.gestures.update(&mut self.blender);
        for clip in &mut self.clips {
            clip.advance(dt);
        }

        let mut pose = self.blender.sample(self.time);
        for clip in &self.clips {
            pose.merge(clip.sample());
        }

        let mut missing = self.pose_skeleton(&pose);
        let pelvis_drop = self.solve_feet(&pose, &mut missing);
        self.solve_hands(&pose, &mut missing);

        let sk = &self.rig.skeleton;
        let mut chains = Vec::new();
        let mut chain_offsets = Vec::new();
        if let Some(hair) = &mut self.hair {
            if let Ok(head) = sk.bone("head") {
                hair.set_anchor(head.end());
            }
            hair.update(dt);
            chains.push(hair.positions());
            chain_offsets.push(hair.offsets());
        }

        missing.sort();
        missing.dedup();
        let frame = Frame {
            index: self.frame,
            time: self.time,
            bones: sk
                .bones()
                .iter()
                .map(|b| BoneSegment {
                    name: b.name().to_string(),
                    start: b.start(),
                    end: b.end(),
                    rotation: b.rotation(),
                })
                .collect(),
            chains,
            chain_offsets,
            properties: pose.properties(),
            unit: self.rig.unit(),
            view_angle: self.config.view_angle,
            pelvis_drop,
            missing,
        };
        self.frame += 1;
        frame
    }

    fn pose_skeleton(&mut self, pose: &Pose) -> Vec<String> {
        let unit = self.rig.unit();
        let sk = &mut self.rig.skeleton;
        sk.reset_to_rest();
        let mut missing = sk.apply_pose(pose, unit);
        sk.solve_forward();
        for key in pose.keys() {
            if let Channel::IkTarget(effector) = Channel::parse(key) {
                self.check_effector(effector, &mut missing);
            }
        }
        missing
    }

    /// Record `ik.<effector>` channels this rig cannot solve.
    fn check_effector(&self, effector: &str, missing: &mut Vec<String>) {
        match HumanoidRig::effector_bones(effector) {
            Some((upper, lower, _)) => missing.extend(
                [upper, lower]
                    .into_iter()
                    .filter(|bone| !self.rig.skeleton.contains(bone)),
            ),
            None => {
                log::warn!("character: no ik chain for effector '{effector}'");
                missing.push(effector.to_string());
            }
        }
    }

    /// Shift of the hips away from their rest position.
    fn root_shift(&self) -> Vec2 {
        let sk = &self.rig.skeleton;
        sk.bone(HumanoidRig::ROOT)
            .map(|b| b.start() - sk.origin())
            .unwrap_or(Vec2::ZERO)
    }

    fn solve_feet(&mut self, pose: &Pose, missing: &mut Vec<String>) -> f32 {
        let unit = self.rig.unit();
        let stride = self.config.stride_factor();
        let shift = self.root_shift();
        let targets: Vec<LegTarget> = Side::BOTH
            .into_iter()
            .filter_map(|side| {
                let effector = format!("foot{}", side.suffix());
                let offset = pose.ik_target(&effector)?;
                let rest = self.rig.rest_effector(&effector)?;
                Some(LegTarget {
                    leg: HumanoidRig::leg(side),
                    foot_x: rest.x + shift.x + offset.x * unit * stride,
                    lift: offset.y * unit,
                })
            })
            .collect();
        if targets.is_empty() {
            return 0.0;
        }
        let report = solve_legs(
            &mut self.rig.skeleton,
            HumanoidRig::ROOT,
            &targets,
            &self.leg_ik,
        );
        missing.extend(report.missing);
        report.pelvis_drop
    }

    fn solve_hands(&mut self, pose: &Pose, missing: &mut Vec<String>) {
        let unit = self.rig.unit();
        let shift = self.root_shift();
        for effector in HAND_EFFECTORS {
            let Some(offset) = pose.ik_target(effector) else {
                continue;
            };
            let (Some((upper, lower, bend)), Some(rest)) = (
                HumanoidRig::effector_bones(effector),
                self.rig.rest_effector(effector),
            ) else {
                continue;
            };
            // Effector offsets point up; screen y points down.
            let target = rest + shift + Vec2::new(offset.x * unit, -offset.y * unit);
            match self
                .rig
                .skeleton
                .solve_two_bone_ik(&upper, &lower, target, bend)
            {
                Ok(_) => {}
                Err(RigError::BoneNotFound(name)) => missing.push(name),
                Err(e) => log::warn!("hand ik '{effector}': {e}"),
            }
        }
    }
}
