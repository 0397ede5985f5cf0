//! Scripted touch input standing in for a real gesture source.

use pullrefresh_foundation::GestureSample;

/// A gesture sample due at `at_ms` after start.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedSample {
    pub at_ms: u64,
    pub sample: GestureSample,
}

/// A pull that crosses the threshold, then, after the refresh, one that
/// falls short.
pub fn demo_script() -> Vec<ScriptedSample> {
    let mut script = Vec::new();
    push_pull(&mut script, 300, &[40.0, 40.0, 40.0, 40.0]);
    push_pull(&mut script, 4_000, &[40.0, 40.0, 40.0]);
    script
}

fn push_pull(script: &mut Vec<ScriptedSample>, start_ms: u64, deltas: &[f32]) {
    let mut at_ms = start_ms;
    for delta in deltas {
        script.push(ScriptedSample {
            at_ms,
            sample: GestureSample::drag(*delta),
        });
        at_ms += 80;
    }
    script.push(ScriptedSample {
        at_ms,
        sample: GestureSample::fling(900.0),
    });
}

/// Last scripted timestamp.
pub fn script_end_ms(script: &[ScriptedSample]) -> u64 {
    script.iter().map(|step| step.at_ms).max().unwrap_or(0)
}
