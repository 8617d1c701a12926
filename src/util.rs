use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic jitter pair in [-1, 1] derived from a node id. Used for
/// pre-seed placement so layouts are reproducible from ids alone.
pub fn stable_jitter(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Shortens a task label so it fits inside a node circle.
pub fn truncate_label(label: &str) -> String {
    let chars = label.chars().collect::<Vec<_>>();
    if chars.len() > 10 {
        let mut short = chars[..8].iter().collect::<String>();
        short.push_str("..");
        short
    } else {
        label.to_owned()
    }
}
