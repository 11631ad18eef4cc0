/// Sound catalog: cue → clip, played through rodio.
///
/// Clips come from the sounds directory, one per cue, named
/// `<name>_<cue>.<ext>` (e.g. `next_0.wav`, `victory_5.ogg`).
/// Cues without a usable file fall back to a procedural chime generated
/// as an in-memory WAV buffer at init time.
///
/// Only one cue plays at a time: a new cue stops the previous one.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundCatalog does nothing).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::status::SoundCue;

/// Parse `<name>_<cue>.<ext>` into a cue. The cue number is the text after
/// the last underscore of the file stem.
pub fn parse_cue_index(file_name: &str) -> Option<SoundCue> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let (_, num) = stem.rsplit_once('_')?;
    SoundCue::from_index(num.parse().ok()?)
}

/// Map each cue to the first matching file (by name) in `dir`.
/// A missing or unreadable directory yields an empty map.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn scan_dir(dir: &Path) -> HashMap<SoundCue, PathBuf> {
    let mut names: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).filter(|p| p.is_file()).collect(),
        Err(e) => {
            tracing::info!("no sounds directory {}: {e}", dir.display());
            return HashMap::new();
        }
    };
    names.sort();

    let mut files = HashMap::new();
    for path in names {
        let cue = path.file_name().and_then(|n| n.to_str()).and_then(parse_cue_index);
        if let Some(cue) = cue {
            files.entry(cue).or_insert(path);
        }
    }
    files
}

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::{BufReader, Cursor};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    use crate::domain::status::SoundCue;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundCatalog {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        files: HashMap<SoundCue, PathBuf>,
        chimes: HashMap<SoundCue, Arc<Vec<u8>>>,
        current: Option<Sink>,
    }

    impl SoundCatalog {
        /// `None` when no audio device is available.
        pub fn new(dir: &Path) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            let files = super::scan_dir(dir);
            tracing::info!("sound catalog: {} of {} cues mapped to files", files.len(), SoundCue::ALL.len());

            // ── Generate fallback chimes ──
            let chimes = SoundCue::ALL
                .iter()
                .map(|&cue| (cue, Arc::new(make_wav(&gen_chime(cue)))))
                .collect();

            Some(SoundCatalog {
                _stream: stream,
                handle,
                files,
                chimes,
                current: None,
            })
        }

        /// Stop whatever is playing and start `cue`.
        pub fn play(&mut self, cue: SoundCue) {
            if let Some(prev) = self.current.take() {
                prev.stop();
            }
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    tracing::debug!("cannot open sink: {e}");
                    return;
                }
            };

            if !self.append_file(&sink, cue) {
                if let Some(buf) = self.chimes.get(&cue) {
                    if let Ok(src) = Decoder::new(Cursor::new(buf.as_ref().clone())) {
                        sink.append(src);
                    }
                }
            }
            self.current = Some(sink);
        }

        /// Queue the cue's file; false when unmapped or undecodable.
        fn append_file(&self, sink: &Sink, cue: SoundCue) -> bool {
            let Some(path) = self.files.get(&cue) else { return false };
            let decoded = File::open(path)
                .map_err(|e| e.to_string())
                .and_then(|f| Decoder::new(BufReader::new(f)).map_err(|e| e.to_string()));
            match decoded {
                Ok(src) => {
                    sink.append(src);
                    true
                }
                Err(e) => {
                    tracing::debug!("falling back to chime for {cue:?} ({}): {e}", path.display());
                    false
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Fallback clip per cue, as (frequency Hz, seconds) note lists.
    fn gen_chime(cue: SoundCue) -> Vec<f32> {
        match cue {
            SoundCue::NextTurn => gen_notes(&[(659.0, 0.06), (523.0, 0.09)], 0.25),
            SoundCue::Question => gen_notes(&[(523.0, 0.07), (659.0, 0.07), (784.0, 0.12)], 0.25),
            SoundCue::AnswerChosen => gen_notes(&[(880.0, 0.05)], 0.2),
            SoundCue::Wrong => gen_slide(440.0, 220.0, 0.3),
            SoundCue::Right => gen_notes(&[(1047.0, 0.05), (1319.0, 0.05), (1568.0, 0.1)], 0.25),
            SoundCue::Victory => gen_notes(
                &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.35)],
                0.3,
            ),
            SoundCue::Welcome => gen_notes(&[(784.0, 0.08), (1047.0, 0.18)], 0.3),
        }
    }

    /// Note sequence with a soft square-ish tone (sine + 3rd harmonic)
    fn gen_notes(notes: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Pitch slide from `from` to `to` Hz
    fn gen_slide(from: f32, to: f32, duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase += freq / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.6);
                (phase * 2.0 * std::f32::consts::PI).sin() * env * 0.3
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a 16-bit PCM buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
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

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundCatalog;

#[cfg(not(feature = "sound"))]
pub struct SoundCatalog;

#[cfg(not(feature = "sound"))]
impl SoundCatalog {
    pub fn new(_dir: &Path) -> Option<Self> { Some(SoundCatalog) }
    pub fn play(&mut self, _cue: SoundCue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_from_file_name() {
        assert_eq!(parse_cue_index("next_0.wav"), Some(SoundCue::NextTurn));
        assert_eq!(parse_cue_index("big_win_5.ogg"), Some(SoundCue::Victory));
        assert_eq!(parse_cue_index("hello_6.mp3"), Some(SoundCue::Welcome));
        assert_eq!(parse_cue_index("hello_7.mp3"), None);
        assert_eq!(parse_cue_index("noindex.wav"), None);
        assert_eq!(parse_cue_index("x_a.wav"), None);
    }

    #[test]
    fn scan_keeps_first_file_per_cue() {
        let dir = std::env::temp_dir().join(format!("hexquiz-sounds-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["b_1.wav", "a_1.wav", "c_4.ogg", "readme.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        let files = scan_dir(&dir);
        assert_eq!(files.len(), 2);
        assert_eq!(files[&SoundCue::Question].file_name().unwrap(), "a_1.wav");
        assert!(files.contains_key(&SoundCue::Right));
        let _ = std::fs::remove_dir_all(&dir);

        assert!(scan_dir(&dir).is_empty());
    }
}
