#![warn(missing_docs)]
//! # food-lens-capture
//!
//! ## Purpose
//! Provides camera device and media stream abstractions plus still-frame
//! encoding.
//!
//! ## Responsibilities
//! - Define backend-agnostic [`CameraDevice`] and [`MediaStream`] traits.
//! - Own one live stream through [`CameraSession`], stopping its tracks on
//!   close or drop.
//! - Encode grabbed RGBA frames as JPEG [`MediaBlob`]s.
//! - Expose a deterministic [`SyntheticCamera`] for CI, tests, and demos.
//!
//! ## Data flow
//! Controller requests a stream with [`VideoConstraints`] -> session grabs a
//! [`Frame`] -> [`encode_jpeg`] -> `image/jpeg` blob enters analysis.
//!
//! ## Ownership and lifetimes
//! A [`CameraSession`] exclusively owns its boxed stream. Frames own their
//! pixel buffers.
//!
//! ## Error model
//! Permission denial, missing devices, ended streams, and encoder failures
//! are reported as [`CaptureError`] values.
//!
//! ## Security and privacy notes
//! Frames are never persisted to disk by this crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use food_lens_core::{JPEG_MIME_TYPE, MediaBlob};
use thiserror::Error;
use tracing::debug;

/// Default requested preview width.
pub const DEFAULT_VIDEO_WIDTH: u32 = 640;

/// Default requested preview height.
pub const DEFAULT_VIDEO_HEIGHT: u32 = 480;

/// JPEG quality used for captured frames (0.8 on a 0..1 scale).
pub const CAPTURE_JPEG_QUALITY: u8 = 80;

/// Media access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConstraints {
    /// Requested frame width.
    pub width: u32,
    /// Requested frame height.
    pub height: u32,
    /// Whether an audio track is requested.
    pub audio: bool,
}

impl VideoConstraints {
    /// Creates a validated video-only request.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidResolution`] when either side is zero.
    pub fn video_only(width: u32, height: u32) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidResolution { width, height });
        }
        Ok(Self {
            width,
            height,
            audio: false,
        })
    }
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIDEO_WIDTH,
            height: DEFAULT_VIDEO_HEIGHT,
            audio: false,
        }
    }
}

/// One grabbed video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Raw RGBA pixel buffer (`width * height * 4` bytes).
    pub rgba: Vec<u8>,
}

impl Frame {
    /// Constructs a validated frame.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidFrameShape`] when the buffer length is
    /// not exactly `width * height * 4`.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(CaptureError::InvalidResolution { width, height })?;
        if rgba.len() != expected {
            return Err(CaptureError::InvalidFrameShape {
                expected,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Live media stream handed out by a camera device.
pub trait MediaStream: Send {
    /// Number of tracks still attached to the stream.
    fn track_count(&self) -> usize;

    /// Returns `true` while at least one track is running.
    fn is_live(&self) -> bool;

    /// Grabs the current video frame.
    ///
    /// # Errors
    /// Returns [`CaptureError::StreamEnded`] once the stream has been stopped.
    fn grab_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Stops every track. Calling it twice is a no-op.
    fn stop(&mut self);
}

/// Trait implemented by concrete camera providers.
pub trait CameraDevice: Send + Sync {
    /// Requests a new stream.
    ///
    /// # Errors
    /// Returns [`CaptureError::PermissionDenied`] when the user or platform
    /// refuses access and [`CaptureError::DeviceUnavailable`] when no camera
    /// can satisfy the request.
    fn open_stream(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError>;
}

/// Exclusive owner of one live camera stream.
pub struct CameraSession {
    constraints: VideoConstraints,
    stream: Box<dyn MediaStream>,
}

impl CameraSession {
    /// Opens a stream on `device`.
    ///
    /// # Errors
    /// Propagates device errors unchanged.
    pub fn open(
        device: &dyn CameraDevice,
        constraints: VideoConstraints,
    ) -> Result<Self, CaptureError> {
        let stream = device.open_stream(&constraints)?;
        debug!(
            stage = "camera",
            action = "open",
            width = constraints.width,
            height = constraints.height,
            tracks = stream.track_count(),
            "camera stream attached"
        );
        Ok(Self {
            constraints,
            stream,
        })
    }

    /// Returns the constraints the session was opened with.
    pub fn constraints(&self) -> VideoConstraints {
        self.constraints
    }

    /// Returns `true` while the underlying stream is live.
    pub fn is_live(&self) -> bool {
        self.stream.is_live()
    }

    /// Grabs the current frame and encodes it as JPEG.
    ///
    /// # Errors
    /// Returns [`CaptureError::StreamEnded`] when the stream died underneath
    /// the session and [`CaptureError::Encode`] when JPEG encoding fails.
    pub fn capture_jpeg(&mut self) -> Result<MediaBlob, CaptureError> {
        let frame = self.stream.grab_frame()?;
        let jpeg = encode_jpeg(&frame, CAPTURE_JPEG_QUALITY)?;
        MediaBlob::new(JPEG_MIME_TYPE, jpeg)
            .map_err(|error| CaptureError::Encode(error.to_string()))
    }

    /// Stops all tracks and releases the stream.
    pub fn close(mut self) {
        self.stream.stop();
        debug!(stage = "camera", action = "close", "camera stream stopped");
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stream.stop();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("constraints", &self.constraints)
            .field("live", &self.stream.is_live())
            .finish()
    }
}

/// Encodes an RGBA frame as baseline JPEG.
///
/// # Errors
/// Returns [`CaptureError::Encode`] when the encoder rejects the frame.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let rgb = rgba_to_rgb(&frame.rgba)?;
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(
            &rgb,
            frame.width,
            frame.height,
            image::ColorType::Rgb8.into(),
        )
        .map_err(|error| CaptureError::Encode(format!("jpeg encoding failed: {error}")))?;
    Ok(jpeg)
}

fn rgba_to_rgb(rgba: &[u8]) -> Result<Vec<u8>, CaptureError> {
    if rgba.len() % 4 != 0 {
        return Err(CaptureError::Encode(format!(
            "invalid RGBA buffer length {}; expected multiple of 4",
            rgba.len()
        )));
    }

    let mut rgb = Vec::with_capacity((rgba.len() / 4) * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    Ok(rgb)
}

/// Deterministic camera for tests, CI, and the CLI demo.
///
/// Frames are a colour gradient shifted by a per-stream sequence number.
#[derive(Debug)]
pub struct SyntheticCamera {
    permission_granted: bool,
    streams_opened: AtomicUsize,
    live_streams: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    /// Creates a camera that grants access.
    pub fn new() -> Self {
        Self {
            permission_granted: true,
            streams_opened: AtomicUsize::new(0),
            live_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a camera that always refuses access.
    pub fn denied() -> Self {
        Self {
            permission_granted: false,
            ..Self::new()
        }
    }

    /// Total streams handed out so far.
    pub fn streams_opened(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
    }

    /// Streams handed out and not yet stopped.
    pub fn live_streams(&self) -> usize {
        self.live_streams.load(Ordering::SeqCst)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraDevice for SyntheticCamera {
    fn open_stream(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError> {
        if !self.permission_granted {
            return Err(CaptureError::PermissionDenied(
                "synthetic camera configured to deny access".to_string(),
            ));
        }
        if constraints.width == 0 || constraints.height == 0 {
            return Err(CaptureError::InvalidResolution {
                width: constraints.width,
                height: constraints.height,
            });
        }

        self.streams_opened.fetch_add(1, Ordering::SeqCst);
        self.live_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SyntheticStream {
            width: constraints.width,
            height: constraints.height,
            sequence: 0,
            live: true,
            live_streams: Arc::clone(&self.live_streams),
        }))
    }
}

struct SyntheticStream {
    width: u32,
    height: u32,
    sequence: u64,
    live: bool,
    live_streams: Arc<AtomicUsize>,
}

impl MediaStream for SyntheticStream {
    fn track_count(&self) -> usize {
        usize::from(self.is_live())
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.is_live() {
            return Err(CaptureError::StreamEnded);
        }

        self.sequence += 1;
        let shift = (self.sequence % 255) as u8;
        let mut rgba = Vec::with_capacity((self.width as usize) * (self.height as usize) * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                let r = ((x * 255) / self.width.max(1)) as u8;
                let g = ((y * 255) / self.height.max(1)) as u8;
                rgba.extend_from_slice(&[r, g, shift, 255]);
            }
        }
        Frame::new(self.width, self.height, rgba)
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Capture layer error type.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Camera access was refused.
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
    /// No camera can satisfy the request.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    /// Requested or reported geometry is unusable.
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Frame buffer does not match declared geometry.
    #[error("invalid frame shape: expected {expected} bytes, got {actual}")]
    InvalidFrameShape {
        /// Expected RGBA byte count.
        expected: usize,
        /// Actual RGBA byte count.
        actual: usize,
    },
    /// Stream was stopped before the frame grab.
    #[error("camera stream has ended")]
    StreamEnded,
    /// Still-image encoding failure.
    #[error("frame encoding failure: {0}")]
    Encode(String),
}
