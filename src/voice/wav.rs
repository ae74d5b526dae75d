//! WAV header helpers

use crate::{Error, Result};

/// Read the sample rate from a WAV header
///
/// # Errors
///
/// Returns `Audio` error if the bytes are not a readable WAV file
pub fn wav_sample_rate(bytes: &[u8]) -> Result<u32> {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes))
        .map_err(|e| Error::Audio(format!("not a WAV file: {e}")))?;
    Ok(reader.spec().sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_wav(sample_rate: u32, samples: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_reads_sample_rate_from_header() {
        assert_eq!(wav_sample_rate(&silent_wav(24000, 10)).unwrap(), 24000);
        assert_eq!(wav_sample_rate(&silent_wav(22050, 0)).unwrap(), 22050);
    }

    #[test]
    fn test_rejects_non_wav_bytes() {
        let err = wav_sample_rate(b"definitely not audio").unwrap_err();
        assert!(matches!(err, Error::Audio(_)));
    }
}
