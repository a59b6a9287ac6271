use ffmpeg_pipe::params::OutputFormat;
use serde::{Deserialize, Serialize};

/// Supported target codecs. A closed set: anything else fails to decode
/// and never reaches the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    Oga,
}

impl AudioCodec {
    pub fn output_format(&self) -> OutputFormat {
        match self {
            AudioCodec::Oga => OutputFormat::Oga,
        }
    }
}

/// Discrete bitrate classes a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioBitrate {
    Kbps32,
    Kbps64,
    Kbps96,
    Kbps128,
    Kbps192,
    Kbps256,
}

impl AudioBitrate {
    pub fn bits_per_second(&self) -> u32 {
        match self {
            AudioBitrate::Kbps32 => 32_000,
            AudioBitrate::Kbps64 => 64_000,
            AudioBitrate::Kbps96 => 96_000,
            AudioBitrate::Kbps128 => 128_000,
            AudioBitrate::Kbps192 => 192_000,
            AudioBitrate::Kbps256 => 256_000,
        }
    }
}

/// One client request on the media connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaRequest {
    Prepare {
        codec: AudioCodec,
        bitrate: AudioBitrate,
        track_id: i64,
    },
    GetPart {
        handle: u32,
        requested_size: usize,
    },
    Terminate {
        handle: u32,
    },
}

/// Reply to one request. `Failure` is the negative acknowledgment for a
/// request that could not be carried out at all; "nothing to report" cases
/// (unknown handle, missing track, admission rejection) keep their normal
/// variant with an empty payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaResponse {
    PrepareResult {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        handle: Option<u32>,
    },
    PartResult {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
    TerminateResult {},
    Failure {
        reason: String,
    },
}

/// Chunk payloads ride inside JSON frames as base64 text.
mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitrate_values() {
        let expected = [
            (AudioBitrate::Kbps32, 32_000),
            (AudioBitrate::Kbps64, 64_000),
            (AudioBitrate::Kbps96, 96_000),
            (AudioBitrate::Kbps128, 128_000),
            (AudioBitrate::Kbps192, 192_000),
            (AudioBitrate::Kbps256, 256_000),
        ];
        for (bitrate, bps) in expected {
            assert_eq!(bitrate.bits_per_second(), bps);
        }
    }

    #[test]
    fn test_request_wire_tags() {
        let json = r#"{"type":"prepare","codec":"oga","bitrate":"kbps128","track_id":7}"#;
        let request: MediaRequest = serde_json::from_str(json).unwrap();
        match request {
            MediaRequest::Prepare {
                codec,
                bitrate,
                track_id,
            } => {
                assert_eq!(codec, AudioCodec::Oga);
                assert_eq!(bitrate, AudioBitrate::Kbps128);
                assert_eq!(track_id, 7);
            }
            other => panic!("expected Prepare, got {:?}", other),
        }

        let json = r#"{"type":"get_part","handle":0,"requested_size":4096}"#;
        let request: MediaRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(request, MediaRequest::GetPart { handle: 0, .. }));
    }

    #[test]
    fn test_unknown_bitrate_rejected() {
        let json = r#"{"type":"prepare","codec":"oga","bitrate":"kbps512","track_id":7}"#;
        assert!(serde_json::from_str::<MediaRequest>(json).is_err());
    }

    #[test]
    fn test_unknown_codec_rejected() {
        let json = r#"{"type":"prepare","codec":"mp3","bitrate":"kbps128","track_id":7}"#;
        assert!(serde_json::from_str::<MediaRequest>(json).is_err());
    }

    #[test]
    fn test_part_result_base64_payload() {
        let response = MediaResponse::PartResult {
            data: vec![1, 2, 3],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"AQID\""), "payload should be base64: {}", json);

        let decoded: MediaResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_prepare_result_handle_absent_on_reject() {
        let json = serde_json::to_string(&MediaResponse::PrepareResult { handle: None }).unwrap();
        assert!(!json.contains("handle"), "soft reject carries no handle: {}", json);

        let decoded: MediaResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, MediaResponse::PrepareResult { handle: None });
    }
}
