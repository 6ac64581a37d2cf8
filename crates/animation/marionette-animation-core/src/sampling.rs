//! Track sampling.
//!
//! Model:
//! - Each Track has keyframes ordered by strictly increasing time (seconds).
//! - Segment [Ki -> K(i+1)] progress is shaped by Ki's easing.
//! - Bool/Text tracks step: the left keyframe holds until the next one.
//! - All other kinds ease the progress, then blend component-wise.
//! - Queries outside the keyed range clamp to the first/last value.

use crate::data::{Keyframe, Track};
use marionette_api_core::blend::blend_values;
use marionette_api_core::Value;

/// Find the segment [i, i+1] that contains `time` and return (i, i+1, local_t),
/// where local_t is normalized to [0, 1] between the two keyframe times.
/// Edge cases:
/// - If time <= first.time, returns (0, 0, 0) and the caller picks keyframes[0].
/// - If time >= last.time, returns (last, last, 0) and the caller picks keyframes[last].
/// - An exact hit on an inner keyframe returns (i, i, 0).
fn find_segment(keyframes: &[Keyframe], time: f32) -> (usize, usize, f32) {
    let n = keyframes.len();
    if n == 0 || n == 1 || time <= keyframes[0].time {
        return (0, 0, 0.0);
    }
    if time >= keyframes[n - 1].time {
        return (n - 1, n - 1, 0.0);
    }
    // First keyframe strictly after `time`; always in 1..n here.
    let hi = keyframes.partition_point(|k| k.time <= time);
    let lo = hi - 1;
    let t0 = keyframes[lo].time;
    if t0 == time {
        return (lo, lo, 0.0);
    }
    let t1 = keyframes[hi].time;
    let denom = (t1 - t0).max(f32::EPSILON);
    (lo, hi, ((time - t0) / denom).clamp(0.0, 1.0))
}

/// Sample a track at `time` seconds. Returns `None` for an empty track.
pub fn sample_track(track: &Track, time: f32) -> Option<Value> {
    let keyframes = track.keyframes();
    let first = keyframes.first()?;
    if time.is_nan() {
        return Some(first.value.clone());
    }
    let (i0, i1, lt) = find_segment(keyframes, time);
    if i0 == i1 {
        return Some(keyframes[i0].value.clone());
    }
    let left = &keyframes[i0];
    let right = &keyframes[i1];

    // Step behavior for Bool/Text tracks regardless of easing.
    if left.value.is_step() {
        return Some(left.value.clone());
    }

    let eased = left.easing.apply(lt);
    Some(blend_values(&left.value, &right.value, eased))
}
