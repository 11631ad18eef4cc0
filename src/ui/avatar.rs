/// Avatar assets: text-art frames keyed by (level, emotion).
///
/// Emotions directory layout:
///   name_<level>_<emotion>.txt         single still frame
///   name_<level>_<emotion>/            animation, frames played in order
///       name-<order>.txt
///
/// Anything else is ignored. A missing directory yields an empty catalog;
/// the renderer then draws the built-in face for each emotion.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::status::{AvatarKey, Emotion};
use crate::error::GameError;

/// One frame of text art, line by line.
pub type Frame = Vec<String>;

#[derive(Default)]
pub struct AssetCatalog {
    frames: BTreeMap<AvatarKey, Vec<Frame>>,
}

impl AssetCatalog {
    pub fn load(dir: &Path) -> Self {
        let mut catalog = AssetCatalog::default();
        let entries = match std::fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::info!("no emotions directory {}: {e}", dir.display());
                return catalog;
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };

            if path.is_dir() {
                let Some(key) = parse_row_col(name) else { continue };
                let frames = load_animation(&path);
                if !frames.is_empty() {
                    catalog.frames.insert(key, frames);
                }
            } else if has_txt_extension(&path) {
                let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(parse_row_col) else {
                    continue;
                };
                // An animation directory for the same key wins over a still.
                if catalog.frames.contains_key(&key) {
                    continue;
                }
                match read_frame(&path) {
                    Some(frame) => {
                        catalog.frames.insert(key, vec![frame]);
                    }
                    None => tracing::debug!("skipping unreadable frame {}", path.display()),
                }
            }
        }

        tracing::info!("avatar catalog: {} keys from {}", catalog.len(), dir.display());
        catalog
    }

    pub fn frames(&self, key: AvatarKey) -> Result<&[Frame], GameError> {
        self.frames
            .get(&key)
            .map(|v| v.as_slice())
            .ok_or(GameError::AssetNotFound { level: key.level, emotion: key.emotion })
    }

    /// Frame to show at animation tick `tick`, or the built-in face.
    pub fn frame_at(&self, key: AvatarKey, tick: u32) -> Vec<&str> {
        match self.frames(key) {
            Ok(frames) if !frames.is_empty() => {
                let frame = &frames[tick as usize % frames.len()];
                frame.iter().map(|s| s.as_str()).collect()
            }
            _ => builtin_face(key.emotion).to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

/// Frames of an animation directory, ordered by their `-<order>` suffix.
fn load_animation(dir: &Path) -> Vec<Frame> {
    let Ok(rd) = std::fs::read_dir(dir) else { return vec![] };
    let mut ordered: Vec<(u32, Frame)> = rd
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_txt_extension(p))
        .filter_map(|p| {
            let order = p.file_stem().and_then(|s| s.to_str()).and_then(parse_order)?;
            Some((order, read_frame(&p)?))
        })
        .collect();
    ordered.sort_by_key(|(order, _)| *order);
    ordered.into_iter().map(|(_, f)| f).collect()
}

fn read_frame(path: &Path) -> Option<Frame> {
    let text = std::fs::read_to_string(path).ok()?;
    let mut lines: Frame = text.lines().map(|l| l.trim_end().to_string()).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Some(lines)
}

fn has_txt_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// `name_<level>_<emotion>` → key. The two numbers are the last two
/// underscore-separated parts; the name itself may contain underscores.
pub fn parse_row_col(stem: &str) -> Option<AvatarKey> {
    let mut parts = stem.rsplitn(3, '_');
    let emotion = parts.next()?.parse().ok().and_then(Emotion::from_index)?;
    let level = parts.next()?.parse().ok()?;
    parts.next()?;
    Some(AvatarKey::new(level, emotion))
}

/// `name-<order>` → order.
pub fn parse_order(stem: &str) -> Option<u32> {
    stem.rsplit_once('-')?.1.parse().ok()
}

// ── Built-in faces ──

const FACE_NORM: [&str; 5] = [
    "  .-----.  ",
    " /  o o  \\ ",
    "|    ^    |",
    " \\  ---  / ",
    "  '-----'  ",
];

const FACE_QUEST: [&str; 5] = [
    "  .-----.  ",
    " /  o O  \\ ",
    "|    ^    |",
    " \\   o   / ",
    "  '-----' ?",
];

const FACE_WRONG: [&str; 5] = [
    "  .-----.  ",
    " /  x x  \\ ",
    "|    ^    |",
    " \\  .-.  / ",
    "  '-----'  ",
];

const FACE_SMILE: [&str; 5] = [
    "  .-----.  ",
    " /  ^ ^  \\ ",
    "|    ^    |",
    " \\ \\___/ / ",
    "  '-----'  ",
];

pub fn builtin_face(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Norm => &FACE_NORM,
        Emotion::Quest => &FACE_QUEST,
        Emotion::Wrong => &FACE_WRONG,
        Emotion::Smile => &FACE_SMILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hexquiz-avatar-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn row_col_names() {
        assert_eq!(parse_row_col("owl_2_3"), Some(AvatarKey::new(2, Emotion::Smile)));
        assert_eq!(parse_row_col("old_man_0_1"), Some(AvatarKey::new(0, Emotion::Quest)));
        assert_eq!(parse_row_col("x_0_4"), None);
        assert_eq!(parse_row_col("0_1"), None);
        assert_eq!(parse_row_col("face"), None);
        assert_eq!(parse_order("face-12"), Some(12));
        assert_eq!(parse_order("face"), None);
    }

    #[test]
    fn loads_stills_and_animations() {
        let dir = temp_dir("load");
        fs::write(dir.join("f_0_0.txt"), "still\n\n").unwrap();
        fs::write(dir.join("notes.md"), "ignored").unwrap();
        let anim = dir.join("f_1_3");
        fs::create_dir_all(&anim).unwrap();
        fs::write(anim.join("f-10.txt"), "third").unwrap();
        fs::write(anim.join("f-2.txt"), "second").unwrap();
        fs::write(anim.join("f-1.txt"), "first").unwrap();

        let cat = AssetCatalog::load(&dir);
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.frames(AvatarKey::new(0, Emotion::Norm)).unwrap(), &[vec!["still".to_string()]]);

        let key = AvatarKey::new(1, Emotion::Smile);
        let order: Vec<&str> = cat.frames(key).unwrap().iter().map(|f| f[0].as_str()).collect();
        assert_eq!(order, ["first", "second", "third"]);
        assert_eq!(cat.frame_at(key, 4), vec!["second"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_assets_fall_back() {
        let cat = AssetCatalog::load(Path::new("/nonexistent/hexquiz/emotions"));
        let key = AvatarKey::new(3, Emotion::Wrong);
        assert!(matches!(cat.frames(key), Err(GameError::AssetNotFound { level: 3, .. })));
        assert_eq!(cat.frame_at(key, 0), builtin_face(Emotion::Wrong).to_vec());
    }
}
