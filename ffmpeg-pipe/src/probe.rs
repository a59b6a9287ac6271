use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

/// Subset of `ffprobe -print_format json -show_format` output.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    format_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    pub duration_sec: Option<f64>,
    pub format_name: Option<String>,
}

/// Probes container-level metadata of a media file with ffprobe.
pub async fn probe(ffprobe: &Path, input: &Path) -> anyhow::Result<MediaInfo> {
    if !input.is_file() {
        anyhow::bail!("input not found: {}", input.display());
    }

    let output = Command::new(ffprobe)
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-print_format",
            "json",
            "-show_format",
        ])
        .arg(input)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("spawn {}: {}", ffprobe.display(), e))?;

    if !output.status.success() {
        anyhow::bail!("ffprobe failed for {} ({})", input.display(), output.status);
    }

    let parsed: ProbeOutput = serde_json::from_slice(&output.stdout)?;
    let format = parsed.format;

    Ok(MediaInfo {
        duration_sec: format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse().ok()),
        format_name: format.and_then(|f| f.format_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_missing_input() {
        let err = probe(Path::new("ffprobe"), Path::new("no_such_file.wav")).await;
        assert!(err.is_err(), "probing a missing file should fail");
    }

    #[tokio::test]
    async fn test_probe_wav_duration() -> anyhow::Result<()> {
        if !crate::testutil::has_binary("ffprobe") {
            eprintln!("skip: ffprobe not found");
            return Ok(());
        }

        let dir = tempfile::tempdir()?;
        let wav = crate::testutil::write_wav_fixture(dir.path(), 1)?;

        let info = probe(Path::new("ffprobe"), &wav).await?;
        let duration = info.duration_sec.expect("wav should have a duration");
        assert!(
            (duration - 1.0).abs() < 0.2,
            "duration {} should be ~1s",
            duration
        );
        Ok(())
    }
}
