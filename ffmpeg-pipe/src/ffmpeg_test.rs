use std::path::Path;

use super::{FfmpegJob, build_args};
use crate::job::TranscodeJob as _;
use crate::params::{OutputFormat, TranscodeParams};
use crate::testutil::{has_binary, write_wav_fixture};

#[test]
fn test_build_args_oga() {
    let params = TranscodeParams::new("/music/track.flac", OutputFormat::Oga, 128_000);
    let args = build_args(&params);

    let expected = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-i",
        "/music/track.flac",
        "-vn",
        "-c:a",
        "libvorbis",
        "-b:a",
        "128000",
        "-f",
        "ogg",
        "pipe:1",
    ];
    assert_eq!(args, expected);
}

#[test]
fn test_build_args_bitrates() {
    for bps in [32_000u32, 64_000, 96_000, 128_000, 192_000, 256_000] {
        let params = TranscodeParams::new("in.wav", OutputFormat::Oga, bps);
        let args = build_args(&params);
        assert!(
            args.contains(&bps.to_string()),
            "args should carry bitrate {}",
            bps
        );
    }
}

#[tokio::test]
async fn test_spawn_missing_input_fails() {
    let params = TranscodeParams::new("no_such_file.flac", OutputFormat::Oga, 128_000);
    let result = FfmpegJob::spawn(Path::new("ffmpeg"), &params).await;
    assert!(result.is_err(), "spawn should fail for a missing input");
}

/// Full pull-to-completion run over a generated WAV. Requires ffmpeg.
#[tokio::test]
async fn test_transcode_wav_to_oga() -> anyhow::Result<()> {
    if !has_binary("ffmpeg") {
        eprintln!("skip: ffmpeg not found");
        return Ok(());
    }

    let dir = tempfile::tempdir()?;
    let wav = write_wav_fixture(dir.path(), 1)?;

    let params = TranscodeParams::new(wav, OutputFormat::Oga, 128_000);
    let mut job = FfmpegJob::spawn(Path::new("ffmpeg"), &params).await?;

    let mut output = Vec::new();
    while !job.is_complete() {
        let chunk = job.produce(4096).await?;
        assert!(chunk.len() <= 4096, "chunk {} exceeds request", chunk.len());
        output.extend_from_slice(&chunk);
    }

    assert!(!output.is_empty(), "transcode should produce output");
    assert_eq!(&output[..4], b"OggS", "output should be an Ogg stream");

    // Completion is final: further pulls are empty and do not error.
    let chunk = job.produce(4096).await?;
    assert!(chunk.is_empty());
    assert!(job.is_complete());

    Ok(())
}

/// Dispose mid-stream must kill the child and return. Requires ffmpeg.
#[tokio::test]
async fn test_dispose_mid_stream() -> anyhow::Result<()> {
    if !has_binary("ffmpeg") {
        eprintln!("skip: ffmpeg not found");
        return Ok(());
    }

    let dir = tempfile::tempdir()?;
    let wav = write_wav_fixture(dir.path(), 1)?;

    let params = TranscodeParams::new(wav, OutputFormat::Oga, 128_000);
    let mut job = FfmpegJob::spawn(Path::new("ffmpeg"), &params).await?;

    let _ = job.produce(1024).await?;
    job.dispose().await;
    Ok(())
}
