use hashbrown::HashMap;
use serde::Deserialize;

use crate::data::AnimationClip;
use crate::easing::Easing;
use crate::error::AnimationError;
use marionette_api_core::Value;

/// Public API: parse stored clip JSON into an [`AnimationClip`].
///
/// Shape:
/// ```json
/// { "name": "fade", "tracks": { "opacity": [ { "time": 0.0, "value": 0.0, "easing": "ease_in" } ] } }
/// ```
///
/// Notes:
/// - Times are seconds from clip start; keyframes may appear in any order.
/// - `easing` is optional and defaults to linear.
/// - Values are converted from untagged shapes: number, bool, string,
///   `{x, y}`, `{r, g, b, a?}` and `{h, s, l}` (converted to RGB).
/// - Every keyframe goes through `Track::add_keyframe`, so authoring errors
///   (non-finite data, mixed kinds) are reported here rather than at playback.
pub fn parse_clip_json(s: &str) -> Result<AnimationClip, AnimationError> {
    let stored: StoredClip =
        serde_json::from_str(s).map_err(|e| AnimationError::Parse(e.to_string()))?;

    let mut clip = AnimationClip::new(stored.name);
    for (property, keys) in stored.tracks {
        for key in keys {
            clip.add_keyframe(
                &property,
                key.time as f32,
                to_core_value(&key.value),
                key.easing,
            )?;
        }
    }
    Ok(clip)
}

fn to_core_value(v: &RawValue) -> Value {
    match v {
        RawValue::Boolean(b) => Value::Bool(*b),
        RawValue::Number(n) => Value::Float(*n as f32),
        RawValue::String(s) => Value::Text(s.clone()),
        RawValue::Vector2 { x, y } => Value::Vec2([*x as f32, *y as f32]),
        RawValue::Rgba { r, g, b, a } => {
            Value::ColorRgba([*r as f32, *g as f32, *b as f32, a.unwrap_or(1.0) as f32])
        }
        RawValue::Hsl { h, s, l } => {
            let (r, g, b) = hsl_to_rgb(*h as f32, *s as f32, *l as f32);
            Value::ColorRgba([r, g, b, 1.0])
        }
    }
}

/// HSL (0..1) to RGB (0..1)
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    (r, g, b)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct StoredClip {
    name: String,
    #[serde(default)]
    tracks: HashMap<String, Vec<StoredKey>>,
}

#[derive(Debug, Deserialize)]
struct StoredKey {
    time: f64,
    value: RawValue,
    #[serde(default)]
    easing: Easing,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Boolean(bool),
    Number(f64),
    String(String),
    Vector2 {
        x: f64,
        y: f64,
    },
    Rgba {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default)]
        a: Option<f64>,
    },
    Hsl {
        h: f64,
        s: f64,
        l: f64,
    },
}
