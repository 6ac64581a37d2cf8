//! Frame sinks and the external FFmpeg encoder.
//!
//! `ffmpeg` is not bundled: [`FfmpegEncoder`] spawns the binary named in its
//! [`EncoderConfig`] and streams raw RGBA frames to its stdin. A missing
//! binary is reported as [`EncodeError::Spawn`], never silently skipped.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to start encoder '{}': {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("encoder already finished")]
    Finished,

    #[error("encoder exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Consumer of rendered RGBA8 frames.
pub trait FrameSink {
    fn write_frame(&mut self, rgba: &[u8]) -> Result<(), EncodeError>;

    /// Flush and close. Further writes fail.
    fn finish(&mut self) -> Result<(), EncodeError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub ffmpeg_path: PathBuf,
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
    pub codec: String,
    pub pixel_format: String,
    pub overwrite: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            frame_rate: 30,
            width: 640,
            height: 480,
            output: PathBuf::from("out.mp4"),
            codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            overwrite: true,
        }
    }
}

impl EncoderConfig {
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Command-line arguments, reading rawvideo RGBA from stdin.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
        if self.overwrite {
            args.push("-y".into());
        }
        args.extend(
            [
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                format!("{}x{}", self.width, self.height).as_str(),
                "-r",
                self.frame_rate.to_string().as_str(),
                "-i",
                "-",
                "-an",
                "-c:v",
                self.codec.as_str(),
                "-pix_fmt",
                self.pixel_format.as_str(),
            ]
            .map(String::from),
        );
        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

pub struct FfmpegEncoder {
    config: EncoderConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    /// Drains the child's stderr so a verbose encoder never blocks on it.
    stderr: Option<JoinHandle<Vec<u8>>>,
    frames: u64,
}

impl FfmpegEncoder {
    pub fn spawn(config: EncoderConfig) -> Result<Self, EncodeError> {
        let mut child = Command::new(&config.ffmpeg_path)
            .args(config.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EncodeError::Spawn {
                path: config.ffmpeg_path.clone(),
                source,
            })?;
        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                if let Err(e) = pipe.read_to_end(&mut buf) {
                    log::warn!("encoder: reading stderr failed: {e}");
                }
                buf
            })
        });
        log::debug!(
            "encoder: writing {}x{} @ {} fps to {}",
            config.width,
            config.height,
            config.frame_rate,
            config.output.display()
        );
        Ok(Self {
            config,
            child: Some(child),
            stdin,
            stderr,
            frames: 0,
        })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    fn join_stderr(&mut self) -> Vec<u8> {
        self.stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

impl FrameSink for FfmpegEncoder {
    fn write_frame(&mut self, rgba: &[u8]) -> Result<(), EncodeError> {
        let expected = self.config.frame_bytes();
        if rgba.len() != expected {
            return Err(EncodeError::FrameSize {
                expected,
                actual: rgba.len(),
            });
        }
        let stdin = self.stdin.as_mut().ok_or(EncodeError::Finished)?;
        stdin.write_all(rgba)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        // Closing stdin tells ffmpeg the stream ended.
        drop(self.stdin.take());
        let mut child = self.child.take().ok_or(EncodeError::Finished)?;
        let status = child.wait()?;
        let stderr = self.join_stderr();
        if !status.success() {
            return Err(EncodeError::Failed {
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        log::debug!("encoder: {} frames written", self.frames);
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            log::warn!("encoder dropped before finish; stopping ffmpeg");
            let _ = child.kill();
            let _ = child.wait();
        }
        self.join_stderr();
    }
}

/// Sink that keeps frames in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub frame_bytes: Option<usize>,
    pub frames: Vec<Vec<u8>>,
    pub finished: bool,
}

impl MemorySink {
    /// Accept frames of exactly `frame_bytes` bytes.
    pub fn with_frame_bytes(frame_bytes: usize) -> Self {
        Self {
            frame_bytes: Some(frame_bytes),
            ..Self::default()
        }
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, rgba: &[u8]) -> Result<(), EncodeError> {
        if self.finished {
            return Err(EncodeError::Finished);
        }
        if let Some(expected) = self.frame_bytes.filter(|&n| n != rgba.len()) {
            return Err(EncodeError::FrameSize {
                expected,
                actual: rgba.len(),
            });
        }
        self.frames.push(rgba.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        self.finished = true;
        Ok(())
    }
}
