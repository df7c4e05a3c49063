use hillrun_common::VehiclePose;
use hillrun_input::{Control, InputState};
use serde::{Deserialize, Serialize};

/// Arcade kinematic model: tri-state throttle, clamped speed, speed-scaled steering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleModel {
    /// Acceleration while forward is held (units/s^2).
    pub forward_accel: f32,
    /// Deceleration while back is held.
    pub brake_decel: f32,
    /// Passive deceleration with no throttle input.
    pub drag_decel: f32,
    pub max_speed: f32,
    /// Steering is ignored at or below this speed.
    pub min_steer_speed: f32,
    /// Speed at which steering authority would reach zero. Deliberately above
    /// `max_speed` so some authority remains at top speed.
    pub steer_falloff_speed: f32,
    /// Cosmetic wheel roll per unit of distance travelled.
    pub wheel_spin_rate: f32,
}

impl Default for VehicleModel {
    fn default() -> Self {
        Self {
            forward_accel: 50.0,
            brake_decel: 70.0,
            drag_decel: 22.0,
            max_speed: 140.0,
            min_steer_speed: 2.0,
            steer_falloff_speed: 170.0,
            wheel_spin_rate: 0.15,
        }
    }
}

impl VehicleModel {
    /// Signed longitudinal acceleration for this tick's input.
    pub fn acceleration(&self, input: InputState) -> f32 {
        if input.get(Control::Forward) {
            self.forward_accel
        } else if input.get(Control::Back) {
            -self.brake_decel
        } else {
            -self.drag_decel
        }
    }

    /// Fraction of full steering rate available at `speed`.
    pub fn steer_authority(&self, speed: f32) -> f32 {
        1.0 - speed / self.steer_falloff_speed
    }

    /// Advance the pose by `dt` seconds.
    ///
    /// Order matters: speed first, then heading (using the new speed), then
    /// position (using the new heading and speed).
    pub fn advance(&self, pose: &VehiclePose, input: InputState, dt: f32) -> VehiclePose {
        // A negative or NaN `max_speed` pins speed at 0.
        let speed = (pose.speed + self.acceleration(input) * dt)
            .max(0.0)
            .min(self.max_speed.max(0.0));

        let mut heading = pose.heading;
        if speed > self.min_steer_speed {
            heading += input.steer() * dt * self.steer_authority(speed);
        }

        let mut position = pose.position;
        position.x -= heading.sin() * speed * dt;
        position.z -= heading.cos() * speed * dt;

        VehiclePose {
            position,
            heading,
            speed,
        }
    }
}

/// Accumulated roll angle of each wheel about its axle. Purely cosmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSet {
    spin: [f32; 4],
}

impl WheelSet {
    pub const COUNT: usize = 4;

    pub fn roll(&mut self, speed: f32, dt: f32, rate: f32) {
        for angle in &mut self.spin {
            *angle -= speed * dt * rate;
        }
    }

    pub fn spin(&self, wheel: usize) -> Option<f32> {
        self.spin.get(wheel).copied()
    }

    pub fn angles(&self) -> [f32; 4] {
        self.spin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    fn held(controls: &[Control]) -> InputState {
        InputState::with(controls)
    }

    #[test]
    fn acceleration_is_tri_state() {
        let m = VehicleModel::default();
        assert_eq!(m.acceleration(held(&[Control::Forward])), 50.0);
        assert_eq!(m.acceleration(held(&[Control::Back])), -70.0);
        assert_eq!(m.acceleration(held(&[])), -22.0);
        assert_eq!(m.acceleration(held(&[Control::Left])), -22.0);
        // Forward wins over back.
        assert_eq!(m.acceleration(held(&[Control::Forward, Control::Back])), 50.0);
    }

    #[test]
    fn speed_stays_clamped_for_any_input_sequence() {
        let m = VehicleModel::default();
        let dts = [0.0, DT, 0.05, 0.5, 3.0, 10.0];
        let mut pose = VehiclePose::default();
        let mut lcg: u32 = 12345;
        for _ in 0..2000 {
            lcg = lcg.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let bits = (lcg >> 16) as usize;
            let mut input = InputState::new();
            for (i, c) in Control::ALL.into_iter().enumerate() {
                input.set_control(c, bits & (1 << i) != 0);
            }
            let dt = dts[(bits >> 4) % dts.len()];
            pose = m.advance(&pose, input, dt);
            assert!((0.0..=140.0).contains(&pose.speed), "speed {}", pose.speed);
        }
    }

    #[test]
    fn coasting_decelerates_at_drag_rate_to_zero() {
        let m = VehicleModel::default();
        let mut pose = VehiclePose {
            speed: 10.0,
            ..VehiclePose::default()
        };
        let mut prev = pose.speed;
        for _ in 0..10 {
            pose = m.advance(&pose, InputState::new(), 0.1);
            assert!(pose.speed <= prev);
            if prev >= 2.2 {
                assert!(approx(prev - pose.speed, 2.2, 1e-4));
            }
            prev = pose.speed;
        }
        assert_eq!(pose.speed, 0.0);
    }

    #[test]
    fn forward_reaches_top_speed_by_2_8_seconds() {
        let m = VehicleModel::default();
        let mut pose = VehiclePose::default();
        // 2.7 s: still accelerating.
        for _ in 0..162 {
            pose = m.advance(&pose, held(&[Control::Forward]), DT);
        }
        assert!(pose.speed < 140.0);
        assert!(approx(pose.speed, 135.0, 1e-2));
        // 2.8 s plus slack for float accumulation.
        for _ in 0..8 {
            pose = m.advance(&pose, held(&[Control::Forward]), DT);
        }
        assert_eq!(pose.speed, 140.0);
        for _ in 0..120 {
            pose = m.advance(&pose, held(&[Control::Forward]), DT);
            assert_eq!(pose.speed, 140.0);
        }
    }

    #[test]
    fn braking_never_reverses() {
        let m = VehicleModel::default();
        let pose = VehiclePose {
            speed: 5.0,
            ..VehiclePose::default()
        };
        let next = m.advance(&pose, held(&[Control::Back]), 1.0);
        assert_eq!(next.speed, 0.0);
        assert_eq!(next.position, pose.position);
    }

    #[test]
    fn no_steering_at_or_below_threshold() {
        let m = VehicleModel::default();
        for &speed in &[0.0, 1.0, 2.0] {
            for &dt in &[0.0, DT, 0.1, 1.0] {
                for steer in [Control::Left, Control::Right] {
                    let pose = VehiclePose {
                        speed,
                        heading: 0.3,
                        ..VehiclePose::default()
                    };
                    // Coasting or braking keeps the new speed <= 2 in these cases.
                    let next = m.advance(&pose, held(&[steer, Control::Back]), dt);
                    assert!(next.speed <= 2.0);
                    assert_eq!(next.heading, 0.3);
                }
            }
        }
    }

    #[test]
    fn steering_authority_fades_with_speed() {
        let m = VehicleModel::default();
        let pose = VehiclePose {
            speed: 140.0,
            ..VehiclePose::default()
        };
        let next = m.advance(&pose, held(&[Control::Forward, Control::Left]), DT);
        let expected = DT * (1.0 - 140.0 / 170.0);
        assert!(approx(next.heading, expected, 1e-7));
        assert!(m.steer_authority(140.0) > 0.17 && m.steer_authority(140.0) < 0.18);

        let right = m.advance(&pose, held(&[Control::Forward, Control::Right]), DT);
        assert!(approx(right.heading, -expected, 1e-7));
    }

    #[test]
    fn one_tick_from_rest_matches_reference() {
        let m = VehicleModel::default();
        let pose = VehiclePose::default();
        let next = m.advance(&pose, held(&[Control::Forward]), DT);
        assert!(approx(next.speed, 50.0 / 60.0, 1e-6));
        assert_eq!(next.position.x, 0.0);
        assert_eq!(next.position.y, 1.4);
        assert!(approx(next.position.z, -(50.0 / 60.0) / 60.0, 1e-6));
        assert!(approx(next.position.z, -0.013_889, 1e-5));
        assert_eq!(next.heading, 0.0);
    }

    #[test]
    fn forward_is_decreasing_x_at_quarter_turn() {
        let m = VehicleModel::default();
        let pose = VehiclePose {
            heading: std::f32::consts::FRAC_PI_2,
            speed: 60.0,
            ..VehiclePose::default()
        };
        let next = m.advance(&pose, held(&[Control::Forward]), 0.5);
        assert!(next.position.x < -30.0);
        assert!(next.position.z.abs() < 1e-3);
        assert_eq!(next.position.y, pose.position.y);
    }

    #[test]
    fn displacement_follows_pose_forward() {
        let m = VehicleModel::default();
        let pose = VehiclePose {
            heading: 1.1,
            speed: 80.0,
            ..VehiclePose::default()
        };
        let next = m.advance(&pose, held(&[Control::Forward]), 0.1);
        let moved = next.position - pose.position;
        let expected = next.forward() * next.speed * 0.1;
        assert!((moved - expected).length() < 1e-4);
        assert_eq!(moved.y, 0.0);
        assert_ne!(moved, Vec3::ZERO);
    }

    #[test]
    fn wheels_roll_backward_with_speed() {
        let mut wheels = WheelSet::default();
        wheels.roll(40.0, 0.5, 0.15);
        for i in 0..WheelSet::COUNT {
            assert!(approx(wheels.spin(i).unwrap(), -3.0, 1e-6));
        }
        assert!(wheels.spin(4).is_none());
        wheels.roll(0.0, 10.0, 0.15);
        assert!(approx(wheels.angles()[0], -3.0, 1e-6));
    }

    #[test]
    fn negative_top_speed_holds_vehicle_still() {
        let m = VehicleModel {
            max_speed: -1.0,
            ..VehicleModel::default()
        };
        let next = m.advance(&VehiclePose::default(), held(&[Control::Forward]), DT);
        assert_eq!(next.speed, 0.0);
        assert_eq!(next.position, VehiclePose::default().position);
    }

    #[test]
    fn partial_params_fill_defaults() {
        let m: VehicleModel = serde_json::from_str(r#"{ "max_speed": 90.0 }"#).unwrap();
        assert_eq!(m.max_speed, 90.0);
        assert_eq!(m.steer_falloff_speed, 170.0);
    }
}
