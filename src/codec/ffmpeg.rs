//! FFmpeg-backed video decoding.
//!
//! Every frame of the best video stream is converted by the software scaler to
//! packed RGB24 or GRAY8 at the native size; resizing happens later.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use ffmpeg_next as ffmpeg;
use ndarray::Array4;
use tracing::debug;

use super::VideoDecoder;
use crate::frame::{ColorMode, RawClip};

#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegVideoDecoder;

impl VideoDecoder for FfmpegVideoDecoder {
    fn decode(&self, path: &Path, max_frames: Option<usize>, mode: ColorMode) -> Result<RawClip> {
        ffmpeg::init().context("initialize ffmpeg")?;
        let mut input = ffmpeg::format::input(&path)
            .with_context(|| format!("failed to open {} with ffmpeg", path.display()))?;
        let (stream_index, parameters) = {
            let stream = input
                .streams()
                .best(ffmpeg::media::Type::Video)
                .ok_or_else(|| anyhow!("file has no video track"))?;
            (stream.index(), stream.parameters())
        };
        let context = ffmpeg::codec::context::Context::from_parameters(parameters)
            .context("load video decoder parameters")?;
        let mut decoder = context
            .decoder()
            .video()
            .context("open ffmpeg video decoder")?;

        let pixel = match mode {
            ColorMode::Rgb => ffmpeg::util::format::pixel::Pixel::RGB24,
            ColorMode::Gray => ffmpeg::util::format::pixel::Pixel::GRAY8,
        };
        let mut scaler = ffmpeg::software::scaling::context::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            pixel,
            decoder.width(),
            decoder.height(),
            ffmpeg::software::scaling::flag::Flags::BILINEAR,
        )
        .context("create ffmpeg scaler")?;

        let mut clip = ClipAccumulator::new(
            decoder.width() as usize,
            decoder.height() as usize,
            mode.channels(),
            max_frames,
        );

        for (stream, packet) in input.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder
                .send_packet(&packet)
                .context("send packet to ffmpeg decoder")?;
            drain(&mut decoder, &mut scaler, &mut clip)?;
            if clip.is_full() {
                break;
            }
        }
        if !clip.is_full() {
            decoder.send_eof().context("flush ffmpeg decoder")?;
            drain(&mut decoder, &mut scaler, &mut clip)?;
        }

        debug!(path = %path.display(), frames = clip.frames, "decoded video");
        clip.finish()
    }
}

fn drain(
    decoder: &mut ffmpeg::decoder::Video,
    scaler: &mut ffmpeg::software::scaling::Context,
    clip: &mut ClipAccumulator,
) -> Result<()> {
    let mut decoded = ffmpeg::frame::Video::empty();
    let mut converted = ffmpeg::frame::Video::empty();
    while !clip.is_full() {
        match decoder.receive_frame(&mut decoded) {
            Ok(()) => {}
            Err(err) if is_drained(&err) => break,
            Err(err) => return Err(err).context("receive frame from ffmpeg decoder"),
        }
        scaler
            .run(&decoded, &mut converted)
            .context("convert frame pixel format")?;
        clip.push(&converted)?;
    }
    Ok(())
}

/// The decoder needs more input or has been fully flushed. Anything else is a
/// broken stream.
fn is_drained(err: &ffmpeg::Error) -> bool {
    matches!(
        err,
        ffmpeg::Error::Eof | ffmpeg::Error::Other { errno: ffmpeg::error::EAGAIN }
    )
}

struct ClipAccumulator {
    width: usize,
    height: usize,
    channels: usize,
    cap: Option<usize>,
    frames: usize,
    pixels: Vec<u8>,
}

impl ClipAccumulator {
    fn new(width: usize, height: usize, channels: usize, cap: Option<usize>) -> Self {
        Self {
            width,
            height,
            channels,
            cap,
            frames: 0,
            pixels: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.frames >= cap)
    }

    fn push(&mut self, frame: &ffmpeg::frame::Video) -> Result<()> {
        let row_bytes = self.width * self.channels;
        let stride = frame.stride(0);
        let data = frame.data(0);
        for row in 0..self.height {
            let start = row * stride;
            self.pixels.extend_from_slice(
                data.get(start..start + row_bytes)
                    .context("ffmpeg frame row is out of bounds")?,
            );
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(self) -> Result<RawClip> {
        Ok(Array4::from_shape_vec(
            (self.frames, self.height, self.width, self.channels),
            self.pixels,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_again_and_eof_end_a_drain() {
        assert!(is_drained(&ffmpeg::Error::Eof));
        assert!(is_drained(&ffmpeg::Error::Other {
            errno: ffmpeg::error::EAGAIN
        }));
        assert!(!is_drained(&ffmpeg::Error::InvalidData));
        assert!(!is_drained(&ffmpeg::Error::Bug));
    }

    #[test]
    fn accumulator_respects_cap() {
        let mut clip = ClipAccumulator::new(2, 2, 3, Some(1));
        assert!(!clip.is_full());
        clip.frames = 1;
        assert!(clip.is_full());
        assert!(!ClipAccumulator::new(2, 2, 1, None).is_full());
    }
}
