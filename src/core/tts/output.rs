use bytes::Bytes;

/// Stem of generated output file names.
pub const DEFAULT_FILENAME_PREFIX: &str = "deepgram_output";

/// Synthesized audio ready to attach to an output item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub binary_property_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// `deepgram_output.<subtype>` for a MIME type, `deepgram_output.bin` when the
/// subtype cannot be read.
pub fn default_filename(mime_type: &str) -> String {
    let extension = mime_type
        .split_once('/')
        .map(|(_, subtype)| subtype.split(';').next().unwrap_or_default().trim())
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or("bin");

    format!("{DEFAULT_FILENAME_PREFIX}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename() {
        assert_eq!(default_filename("audio/mpeg"), "deepgram_output.mpeg");
        assert_eq!(default_filename("audio/wav"), "deepgram_output.wav");
        assert_eq!(default_filename("audio/basic"), "deepgram_output.basic");
        assert_eq!(
            default_filename("audio/wav; codecs=1"),
            "deepgram_output.wav"
        );
        assert_eq!(default_filename("audio/"), "deepgram_output.bin");
        assert_eq!(default_filename("garbage"), "deepgram_output.bin");
    }
}
