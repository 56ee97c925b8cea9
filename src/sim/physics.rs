//! Ball and paddle physics
//!
//! Paddle bounces are not mirror reflections: the outgoing angle is shaped by
//! where the ball struck the paddle and which way the paddle was moving, and
//! the ball speeds up a little each time. Bricks and walls use plain axis
//! reflection so they conserve speed.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::BALL_MIN_VERTICAL_SPEED;
use crate::tuning::Tuning;

/// Angle offsets (degrees) for the five equal paddle zones, left to right
pub const ZONE_OFFSETS_DEG: [f32; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];
/// Angle change (degrees) from a moving paddle
pub const ENGLISH_DEG: f32 = 10.0;
/// Paddle speeds at or below this (pixels/frame) add no english
pub const ENGLISH_DEADZONE: f32 = 0.1;
/// Bounce angles are kept within [-180 + margin, -margin] degrees
pub const BOUNCE_MARGIN_DEG: f32 = 20.0;

/// Angle offset for a strike at `ball_center_x` on `paddle`
///
/// A ball centre outside the paddle counts as the nearest outer zone.
pub fn zone_offset_deg(ball_center_x: f32, paddle: &Rect) -> f32 {
    let zone_width = paddle.width() / ZONE_OFFSETS_DEG.len() as f32;
    if zone_width <= 0.0 {
        return 0.0;
    }
    let zone = ((ball_center_x - paddle.left()) / zone_width).floor();
    let zone = zone.clamp(0.0, (ZONE_OFFSETS_DEG.len() - 1) as f32) as usize;
    ZONE_OFFSETS_DEG[zone]
}

/// Angle offset from paddle motion relative to the ball's horizontal motion
///
/// Moving with the ball flattens its path; moving against it steepens it.
pub fn english_offset_deg(paddle_vel_x: f32, ball_vel_x: f32) -> f32 {
    if paddle_vel_x.abs() <= ENGLISH_DEADZONE {
        return 0.0;
    }
    if ball_vel_x == 0.0 {
        return paddle_vel_x.signum() * ENGLISH_DEG;
    }
    if paddle_vel_x.signum() == ball_vel_x.signum() {
        ball_vel_x.signum() * ENGLISH_DEG
    } else {
        -ball_vel_x.signum() * ENGLISH_DEG
    }
}

/// Clamp an upward angle (radians, `atan2(vy, vx)` with +y down) so the ball
/// leaves the paddle at least 20 degrees above horizontal
pub fn clamp_bounce_angle(angle: f32) -> f32 {
    let lo = (-180.0 + BOUNCE_MARGIN_DEG).to_radians();
    let hi = (-BOUNCE_MARGIN_DEG).to_radians();
    angle.clamp(lo, hi)
}

/// Velocity after the ball strikes the paddle
pub fn paddle_bounce(
    ball_vel: Vec2,
    ball_center_x: f32,
    paddle: &Rect,
    paddle_vel_x: f32,
    tuning: &Tuning,
) -> Vec2 {
    let speed = tuning.bounced_speed(ball_vel.length());

    // Mirror first so the base angle always points up
    let mirrored = Vec2::new(ball_vel.x, -ball_vel.y.abs());
    let mut angle = mirrored.y.atan2(mirrored.x);

    angle += zone_offset_deg(ball_center_x, paddle).to_radians();
    angle += english_offset_deg(paddle_vel_x, ball_vel.x).to_radians();
    let angle = clamp_bounce_angle(angle);

    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Point the velocity away from a (possibly summed) contact normal
///
/// Each non-zero normal axis negates that velocity component so it points
/// along the normal. A zero normal (opposing contacts cancelled) reverses
/// the ball.
pub fn reflect_along_normal(vel: Vec2, normal: Vec2) -> Vec2 {
    if normal == Vec2::ZERO {
        return -vel;
    }
    let mut out = vel;
    if normal.x != 0.0 {
        out.x = vel.x.abs() * normal.x.signum();
    }
    if normal.y != 0.0 {
        out.y = vel.y.abs() * normal.y.signum();
    }
    out
}

/// Reflection for a ball already overlapping a brick: flip the axis with
/// the smaller penetration
pub fn reflect_by_overlap(vel: Vec2, ball: &Rect, brick: &Rect) -> Vec2 {
    let overlap = ball.overlap(brick);
    if overlap.x < overlap.y {
        Vec2::new(-vel.x, vel.y)
    } else {
        Vec2::new(vel.x, -vel.y)
    }
}

/// Keep |vy| at or above the minimum so the ball never drifts sideways forever
pub fn enforce_min_vertical_speed(vel: Vec2) -> Vec2 {
    if vel.y.abs() < BALL_MIN_VERTICAL_SPEED {
        let vy = if vel.y < 0.0 {
            -BALL_MIN_VERTICAL_SPEED
        } else {
            BALL_MIN_VERTICAL_SPEED
        };
        Vec2::new(vel.x, vy)
    } else {
        vel
    }
}

/// Exponential approach toward `target` over `frames` reference frames
pub fn smooth_toward(current: f32, target: f32, accel: f32, frames: f32) -> f32 {
    let factor = 1.0 - (1.0 - accel).powf(frames.max(0.0));
    current + (target - current) * factor
}

/// Rotate a velocity by `degrees` (positive turns clockwise on screen)
pub fn rotate_deg(vel: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(vel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paddle() -> Rect {
        Rect::new(350.0, 570.0, 100.0, 20.0)
    }

    fn angle_from_vertical_deg(vel: Vec2) -> f32 {
        vel.x.atan2(-vel.y).to_degrees().abs()
    }

    #[test]
    fn test_zone_offsets() {
        let p = paddle();
        assert_eq!(zone_offset_deg(355.0, &p), -20.0);
        assert_eq!(zone_offset_deg(375.0, &p), -10.0);
        assert_eq!(zone_offset_deg(400.0, &p), 0.0);
        assert_eq!(zone_offset_deg(425.0, &p), 10.0);
        assert_eq!(zone_offset_deg(445.0, &p), 20.0);
        // Outside the paddle clamps to the outer zones
        assert_eq!(zone_offset_deg(300.0, &p), -20.0);
        assert_eq!(zone_offset_deg(500.0, &p), 20.0);
    }

    #[test]
    fn test_center_hit_straight_down_goes_straight_up() {
        let v = paddle_bounce(Vec2::new(0.0, 5.0), 400.0, &paddle(), 0.0, &Tuning::default());
        assert!(v.x.abs() < 1e-4);
        assert!(v.y < 0.0);
        assert!((v.length() - 5.0 * 1.025).abs() < 1e-4);
    }

    #[test]
    fn test_outer_zone_turns_ball() {
        let tuning = Tuning::default();
        let left = paddle_bounce(Vec2::new(0.0, 5.0), 352.0, &paddle(), 0.0, &tuning);
        let right = paddle_bounce(Vec2::new(0.0, 5.0), 448.0, &paddle(), 0.0, &tuning);
        assert!(left.x < 0.0 && left.y < 0.0);
        assert!(right.x > 0.0 && right.y < 0.0);
        assert!((angle_from_vertical_deg(left) - 20.0).abs() < 1e-3);
        assert!((angle_from_vertical_deg(right) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_english() {
        // Paddle moving with the ball flattens, against it steepens
        assert_eq!(english_offset_deg(4.0, 3.0), 10.0);
        assert_eq!(english_offset_deg(-4.0, 3.0), -10.0);
        assert_eq!(english_offset_deg(-4.0, -3.0), -10.0);
        assert_eq!(english_offset_deg(4.0, -3.0), 10.0);
        assert_eq!(english_offset_deg(0.05, 3.0), 0.0);
        assert_eq!(english_offset_deg(-2.0, 0.0), -10.0);

        let tuning = Tuning::default();
        let incoming = Vec2::new(3.0, 4.0);
        let still = paddle_bounce(incoming, 400.0, &paddle(), 0.0, &tuning);
        let with = paddle_bounce(incoming, 400.0, &paddle(), 5.0, &tuning);
        let against = paddle_bounce(incoming, 400.0, &paddle(), -5.0, &tuning);
        assert!(angle_from_vertical_deg(with) > angle_from_vertical_deg(still));
        assert!(angle_from_vertical_deg(against) < angle_from_vertical_deg(still));
    }

    #[test]
    fn test_clamp_excludes_near_horizontal() {
        let tuning = Tuning::default();
        // Shallow incoming ball, outer zone and english all pushing right
        let v = paddle_bounce(Vec2::new(8.0, 1.0), 449.0, &paddle(), 6.0, &tuning);
        assert!((angle_from_vertical_deg(v) - 70.0).abs() < 1e-3);
        assert!(v.y < 0.0);
    }

    #[test]
    fn test_speed_cap_applies_to_bounce() {
        let tuning = Tuning::default().with_speed_cap(10.0);
        let v = paddle_bounce(Vec2::new(0.0, 9.9), 400.0, &paddle(), 0.0, &tuning);
        assert!((v.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_along_normal() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(reflect_along_normal(v, Vec2::new(0.0, 1.0)), Vec2::new(3.0, 4.0));
        assert_eq!(reflect_along_normal(v, Vec2::new(-1.0, 0.0)), Vec2::new(-3.0, -4.0));
        // Two bricks side by side hit from below
        assert_eq!(reflect_along_normal(v, Vec2::new(0.0, 2.0)), Vec2::new(3.0, 4.0));
        // Inside corner
        assert_eq!(reflect_along_normal(v, Vec2::new(-1.0, 1.0)), Vec2::new(-3.0, 4.0));
        assert_eq!(reflect_along_normal(v, Vec2::ZERO), Vec2::new(-3.0, 4.0));
    }

    #[test]
    fn test_reflect_by_overlap() {
        let brick = Rect::new(0.0, 0.0, 60.0, 20.0);
        // Ball poking into the bottom face: smaller overlap on y
        let ball = Rect::new(20.0, 17.0, 15.0, 15.0);
        assert_eq!(
            reflect_by_overlap(Vec2::new(1.0, -5.0), &ball, &brick),
            Vec2::new(1.0, 5.0)
        );
        // Ball poking into the left face: smaller overlap on x
        let ball = Rect::new(-13.0, 3.0, 15.0, 15.0);
        assert_eq!(
            reflect_by_overlap(Vec2::new(5.0, 1.0), &ball, &brick),
            Vec2::new(-5.0, 1.0)
        );
    }

    #[test]
    fn test_min_vertical_speed() {
        assert_eq!(enforce_min_vertical_speed(Vec2::new(5.0, 0.2)), Vec2::new(5.0, 1.0));
        assert_eq!(enforce_min_vertical_speed(Vec2::new(5.0, -0.2)), Vec2::new(5.0, -1.0));
        assert_eq!(enforce_min_vertical_speed(Vec2::new(5.0, 0.0)), Vec2::new(5.0, 1.0));
        assert_eq!(enforce_min_vertical_speed(Vec2::new(5.0, -3.0)), Vec2::new(5.0, -3.0));
    }

    #[test]
    fn test_smooth_toward() {
        let one = smooth_toward(0.0, 6.0, 0.35, 1.0);
        assert!((one - 2.1).abs() < 1e-5);
        // Two half-frames equal one full frame
        let half = smooth_toward(smooth_toward(0.0, 6.0, 0.35, 0.5), 6.0, 0.35, 0.5);
        assert!((half - one).abs() < 1e-5);
        assert_eq!(smooth_toward(3.0, 6.0, 0.35, 0.0), 3.0);
        assert!((smooth_toward(0.0, 6.0, 1.0, 1.0) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_deg() {
        let v = rotate_deg(Vec2::new(0.0, -5.0), 90.0);
        assert!((v - Vec2::new(5.0, 0.0)).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_bounce_angle_within_70_of_vertical(
            strike in -20.0f32..120.0,
            paddle_vel in -8.0f32..8.0,
            vx in -12.0f32..12.0,
            vy in 0.5f32..12.0,
        ) {
            let p = paddle();
            let v = paddle_bounce(Vec2::new(vx, vy), p.left() + strike, &p, paddle_vel, &Tuning::default());
            prop_assert!(v.y < 0.0);
            prop_assert!(angle_from_vertical_deg(v) <= 70.0 + 1e-3);
        }

        #[test]
        fn prop_bounce_scales_speed(
            strike in 0.0f32..100.0,
            vx in -12.0f32..12.0,
            vy in 0.5f32..12.0,
        ) {
            let incoming = Vec2::new(vx, vy);
            let p = paddle();
            let v = paddle_bounce(incoming, p.left() + strike, &p, 0.0, &Tuning::default());
            prop_assert!((v.length() - incoming.length() * 1.025).abs() < 1e-3);
        }

        #[test]
        fn prop_axis_reflection_conserves_speed(
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            nx in -2i32..=2,
            ny in -2i32..=2,
        ) {
            let v = Vec2::new(vx, vy);
            let out = reflect_along_normal(v, Vec2::new(nx as f32, ny as f32));
            prop_assert!((out.length() - v.length()).abs() < 1e-4);
        }
    }
}
