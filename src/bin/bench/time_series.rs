// Per-Run JSONL Ripple Recorder
// One JSON line per ripple sample for independent analysis

use ripple_engine::RippleSeries;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct RippleSnapshot {
    pub step: usize,
    pub solved: u32,
    pub ripple: u32,
    pub recovered_pct: f64,
}

/// Write every sample of `series` to `path`, creating parent directories.
pub fn write_jsonl(series: &RippleSeries, k: u32, path: &std::path::Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for (step, sample) in series.samples().iter().enumerate() {
        let snapshot = RippleSnapshot {
            step,
            solved: sample.solved,
            ripple: sample.ripple,
            recovered_pct: 100.0 * sample.solved as f64 / k as f64,
        };
        let line = serde_json::to_string(&snapshot).map_err(std::io::Error::other)?;
        writeln!(file, "{}", line)?;
    }
    file.flush()
}
