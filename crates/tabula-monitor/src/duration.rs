//! 経過時間の表示

use std::fmt::Write as _;

/// Render milliseconds as `HHhMMmSSsmmmms`, dropping leading units that are zero.
///
/// `0` is `"000ms"`, `61500` is `"01m01s500ms"`, `3600000` is `"01h00m00s000ms"`.
pub fn format_duration(millis: u64) -> String {
    let ms = millis % 1000;
    let total_secs = millis / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours:02}h");
    }
    if hours > 0 || mins > 0 {
        let _ = write!(out, "{mins:02}m");
    }
    if hours > 0 || mins > 0 || secs > 0 {
        let _ = write!(out, "{secs:02}s");
    }
    let _ = write!(out, "{ms:03}ms");
    out
}
