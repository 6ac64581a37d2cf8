//! Offline rendering loop.

use crate::character::Character;
use crate::clock::FrameClock;
use crate::encoder::{EncodeError, FrameSink};
use crate::raster::RasterTarget;
use crate::surface::{draw_frame, DrawStyle};

/// Advance `character` by `frames` fixed steps of `1 / frame_rate`, draw each
/// frame into `target` and hand the pixels to `sink`. The sink is finished
/// once every frame is written. Returns the number of frames written.
pub fn render_sequence(
    character: &mut Character,
    frames: u64,
    target: &mut RasterTarget,
    sink: &mut dyn FrameSink,
    style: &DrawStyle,
) -> Result<u64, EncodeError> {
    let mut clock = FrameClock::new(character.config().frame_rate);
    let dt = clock.dt();
    while clock.frame() < frames {
        let (index, _) = clock.tick();
        let frame = character.advance(dt);
        if !frame.missing.is_empty() {
            log::debug!("render: frame {index} skipped bones {:?}", frame.missing);
        }
        draw_frame(&frame, target, style);
        sink.write_frame(target.pixels())?;
    }
    sink.finish()?;
    Ok(clock.frame())
}
