/// Sound engine: procedural beeps via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Build without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::wav;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_bump: Arc<Vec<u8>>,
        sfx_level: Arc<Vec<u8>>,
        sfx_win: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_bump: Arc::new(wav::encode(&wav::gen_bump())),
                sfx_level: Arc::new(wav::encode(&wav::gen_level_up())),
                sfx_win: Arc::new(wav::encode(&wav::gen_win_beep())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_bump(&self) { self.play(&self.sfx_bump); }
        pub fn play_level_up(&self) { self.play(&self.sfx_level); }
        pub fn play_win(&self) { self.play(&self.sfx_win); }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveforms and WAV encoding (mono f32 → 16-bit PCM)
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod wav {
    use std::f32::consts::PI;

    pub const SAMPLE_RATE: u32 = 22050;

    fn tone(freq: f32, duration: f32, volume: f32, out: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            out.push((t * freq * 2.0 * PI).sin() * env * volume);
        }
    }

    /// Wall bump: short low thud.
    pub fn gen_bump() -> Vec<f32> {
        let mut s = Vec::new();
        tone(110.0, 0.04, 0.2, &mut s);
        s
    }

    /// Level cleared: two rising notes.
    pub fn gen_level_up() -> Vec<f32> {
        let mut s = Vec::new();
        tone(659.0, 0.06, 0.25, &mut s);
        tone(988.0, 0.10, 0.25, &mut s);
        s
    }

    /// Final win: a plain square-ish beep, repeated twice.
    pub fn gen_win_beep() -> Vec<f32> {
        let mut s = Vec::new();
        for _ in 0..2 {
            let n = (SAMPLE_RATE as f32 * 0.18) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let wave = (t * 1000.0 * 2.0 * PI).sin() * 0.7
                    + (t * 3000.0 * 2.0 * PI).sin() * 0.2;
                s.push(wave * 0.3);
            }
            s.extend(std::iter::repeat(0.0).take((SAMPLE_RATE as f32 * 0.06) as usize));
        }
        s
    }

    pub fn encode(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let samples = gen_level_up();
            let buf = encode(&samples);
            assert_eq!(&buf[0..4], b"RIFF");
            assert_eq!(&buf[8..12], b"WAVE");
            assert_eq!(buf.len(), 44 + samples.len() * 2);
            let data_size = u32::from_le_bytes([buf[40], buf[41], buf[42], buf[43]]);
            assert_eq!(data_size as usize, samples.len() * 2);
        }

        #[test]
        fn samples_stay_in_range() {
            for s in [gen_bump(), gen_level_up(), gen_win_beep()] {
                assert!(!s.is_empty());
                assert!(s.iter().all(|v| v.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_bump(&self) {}
    pub fn play_level_up(&self) {}
    pub fn play_win(&self) {}
}
