use std::path::{Path, PathBuf};

/// True when `name` is runnable from PATH. Tests that need the real ffmpeg
/// tools skip themselves when it is not.
pub fn has_binary(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Writes a silent 16-bit mono 44.1kHz PCM WAV of `seconds` length.
pub fn write_wav_fixture(dir: &Path, seconds: u32) -> anyhow::Result<PathBuf> {
    const SAMPLE_RATE: u32 = 44_100;
    const BLOCK_ALIGN: u16 = 2; // mono, 16-bit

    let data_len = seconds * SAMPLE_RATE * BLOCK_ALIGN as u32;
    let mut wav = Vec::with_capacity(44 + data_len as usize);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * BLOCK_ALIGN as u32).to_le_bytes());
    wav.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);

    let path = dir.join("fixture.wav");
    std::fs::write(&path, wav)?;
    Ok(path)
}
