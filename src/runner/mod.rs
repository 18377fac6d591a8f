//! QWOP-style ragdoll runner.
//!
//! A hip point mass with two thigh/calf legs, advanced one fixed step per
//! animation frame. Four held "muscle" keys push angular velocity into the
//! joints; any grounded foot shoves the hip forward. The runner falls when it
//! tilts past the tilt limit or its hip reaches the ground.
//!
//! Everything in this module is plain data and arithmetic so it runs and tests
//! natively. The browser side lives in [`shell`].

pub mod params;
pub mod shell;

pub use params::{AngleRange, RestPose, RunnerParams};

/// 2D point or vector in canvas pixels (y down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point `length` away along `angle`, measured from straight down.
    fn reach(self, angle: f64, length: f64) -> Self {
        Self::new(self.x + angle.sin() * length, self.y + angle.cos() * length)
    }
}

/// Hinge angle (radians, relative to its parent segment) and its angular velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Joint {
    pub angle: f64,
    pub velocity: f64,
}

impl Joint {
    fn at(angle: f64) -> Self {
        Self { angle, velocity: 0.0 }
    }

    // impulse -> integrate -> damp -> clip
    fn advance(&mut self, held: bool, impulse: f64, damping: f64, range: &AngleRange) {
        if held {
            self.velocity += impulse;
        }
        self.angle += self.velocity;
        self.velocity *= damping;
        self.angle = range.clamp_rad(self.angle);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Leg {
    /// Measured from the hip, relative to body rotation.
    pub thigh: Joint,
    /// Measured from the thigh.
    pub calf: Joint,
    pub contact: bool,
}

/// World positions of one leg, derived from the body state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegPose {
    pub knee: Point,
    pub foot: Point,
}

/// Snapshot of joint positions for drawing. Never stored; see [`Body::pose`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub hip: Point,
    pub left: LegPose,
    pub right: LegPose,
    pub rotation: f64,
}

/// Held state of the four muscle keys for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub left_thigh: bool,
    pub right_thigh: bool,
    pub left_calf: bool,
    pub right_calf: bool,
}

impl DriveInput {
    pub const NONE: Self = Self { left_thigh: false, right_thigh: false, left_calf: false, right_calf: false };
    pub const ALL: Self = Self { left_thigh: true, right_thigh: true, left_calf: true, right_calf: true };
}

/// Full dynamic state of the ragdoll.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub hip: Point,
    pub hip_velocity: Point,
    pub left: Leg,
    pub right: Leg,
    /// Whole-body lean in radians, positive leaning forward.
    pub rotation: f64,
    pub rotation_velocity: f64,
}

impl Body {
    /// Default pose at the start point, everything at rest.
    pub fn new(params: &RunnerParams) -> Self {
        let pose = &params.rest_pose;
        Self {
            hip: Point::new(params.start_x, params.start_y),
            hip_velocity: Point::default(),
            left: Leg {
                thigh: Joint::at(pose.left_thigh.to_radians()),
                calf: Joint::at(pose.left_calf.to_radians()),
                contact: false,
            },
            right: Leg {
                thigh: Joint::at(pose.right_thigh.to_radians()),
                calf: Joint::at(pose.right_calf.to_radians()),
                contact: false,
            },
            rotation: 0.0,
            rotation_velocity: 0.0,
        }
    }

    /// Forward kinematics: hip -> knee along the thigh, knee -> foot along thigh + calf.
    pub fn pose(&self, params: &RunnerParams) -> Pose {
        let chain = |leg: &Leg| {
            let thigh_dir = self.rotation + leg.thigh.angle;
            let knee = self.hip.reach(thigh_dir, params.thigh_length);
            let foot = knee.reach(thigh_dir + leg.calf.angle, params.calf_length);
            LegPose { knee, foot }
        };
        Pose { hip: self.hip, left: chain(&self.left), right: chain(&self.right), rotation: self.rotation }
    }

    pub fn grounded(&self) -> bool {
        self.left.contact || self.right.contact
    }

    /// Ground reaction: lift the hip so the lowest foot sits on the ground line
    /// and cancel any downward hip velocity.
    fn stand_on_ground(&mut self, params: &RunnerParams) {
        let pose = self.pose(params);
        let sink = pose.left.foot.y.max(pose.right.foot.y) - params.ground_y;
        if sink > 0.0 {
            self.hip.y -= sink;
            if self.hip_velocity.y > 0.0 {
                self.hip_velocity.y = 0.0;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallReason {
    /// Leaned past the tilt limit.
    Tipped,
    /// Hip reached the ground line.
    HipGrounded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    Fallen(FallReason),
}

/// Simulation context: the single body plus the run's progress and end state.
#[derive(Clone, Debug)]
pub struct RunnerSim {
    params: RunnerParams,
    body: Body,
    distance: u32,
    fallen: Option<FallReason>,
    steps: u64,
}

impl Default for RunnerSim {
    fn default() -> Self {
        Self::new(RunnerParams::default())
    }
}

impl RunnerSim {
    pub fn new(params: RunnerParams) -> Self {
        let body = Body::new(&params);
        Self { params, body, distance: 0, fallen: None, steps: 0 }
    }

    /// Throw the body away and start over from the default pose.
    pub fn reset(&mut self) {
        log::debug!("runner reset after {} steps, distance {}m", self.steps, self.distance);
        self.body = Body::new(&self.params);
        self.distance = 0;
        self.fallen = None;
        self.steps = 0;
    }

    /// Advance one fixed step. After a fall this is a no-op.
    pub fn step(&mut self, input: &DriveInput) -> StepOutcome {
        if let Some(reason) = self.fallen {
            return StepOutcome::Fallen(reason);
        }
        let p = &self.params;
        let b = &mut self.body;

        for (joint, held, range) in [
            (&mut b.left.thigh, input.left_thigh, &p.thigh_range),
            (&mut b.right.thigh, input.right_thigh, &p.thigh_range),
            (&mut b.left.calf, input.left_calf, &p.calf_range),
            (&mut b.right.calf, input.right_calf, &p.calf_range),
        ] {
            joint.advance(held, p.muscle_impulse, p.joint_damping, range);
        }

        // Contacts for this step, with grounded feet held on the line.
        b.stand_on_ground(p);
        let pose = b.pose(p);
        let touch = p.ground_y - p.contact_tolerance;
        b.left.contact = pose.left.foot.y >= touch;
        b.right.contact = pose.right.foot.y >= touch;

        for grounded in [b.left.contact, b.right.contact] {
            if grounded && b.hip_velocity.x < p.push_speed_cap {
                b.hip_velocity.x += p.push;
            }
        }

        b.hip_velocity.y += p.gravity;
        b.hip.x += b.hip_velocity.x;
        b.hip.y += b.hip_velocity.y;

        if b.grounded() {
            b.rotation_velocity *= p.rotation_damping;
        } else {
            b.rotation_velocity += b.hip_velocity.x * p.tumble_factor;
        }
        b.rotation += b.rotation_velocity;

        // Integration and lean may have pushed a foot through the ground again.
        b.stand_on_ground(p);

        self.steps += 1;
        self.distance = (self.body.hip.x - self.params.start_x).floor().max(0.0) as u32;

        let fall = if self.body.rotation.abs() > self.params.max_tilt_rad() {
            Some(FallReason::Tipped)
        } else if self.body.hip.y >= self.params.ground_y {
            Some(FallReason::HipGrounded)
        } else {
            None
        };
        match fall {
            Some(reason) => {
                log::info!("runner fell ({reason:?}) after {} steps at {}m", self.steps, self.distance);
                self.fallen = Some(reason);
                StepOutcome::Fallen(reason)
            }
            None => StepOutcome::Running,
        }
    }

    pub fn params(&self) -> &RunnerParams {
        &self.params
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Knee and foot positions for the current state.
    pub fn pose(&self) -> Pose {
        self.body.pose(&self.params)
    }

    /// Whole meters travelled past the start line, never negative.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn is_game_over(&self) -> bool {
        self.fallen.is_some()
    }

    pub fn fall_reason(&self) -> Option<FallReason> {
        self.fallen
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
