use std::path::PathBuf;

/// Target format of a transcode job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Ogg container with Vorbis audio.
    Oga,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Oga => "audio/ogg",
        }
    }

    /// FFmpeg muxer name (`-f`).
    pub fn muxer(&self) -> &'static str {
        match self {
            OutputFormat::Oga => "ogg",
        }
    }

    /// FFmpeg audio encoder name (`-c:a`).
    pub fn audio_codec(&self) -> &'static str {
        match self {
            OutputFormat::Oga => "libvorbis",
        }
    }
}

/// Parameters of one transcode job, fixed once the job is started.
#[derive(Debug, Clone)]
pub struct TranscodeParams {
    pub input: PathBuf,
    pub format: OutputFormat,
    /// Target audio bitrate in bits per second.
    pub bitrate_bps: u32,
}

impl TranscodeParams {
    pub fn new(input: impl Into<PathBuf>, format: OutputFormat, bitrate_bps: u32) -> Self {
        Self {
            input: input.into(),
            format,
            bitrate_bps,
        }
    }
}
