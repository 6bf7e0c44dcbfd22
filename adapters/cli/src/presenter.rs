use anyhow::Result;
use dolphin_run_core::{PilotMode, SessionPhase};
use dolphin_run_rendering::{Presenter, Scene};

/// Presenter that reports scenes through the `log` facade.
///
/// A line is written every `every` ticks and whenever the pilot mode or the
/// session phase changes.
#[derive(Debug)]
pub(crate) struct LogPresenter {
    every: u64,
    last: Option<(PilotMode, SessionPhase)>,
    presented: u64,
}

impl LogPresenter {
    /// Creates a presenter that summarises one scene out of `every`.
    pub(crate) fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            last: None,
            presented: 0,
        }
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, tick: u64, scene: &Scene) -> Result<()> {
        self.presented += 1;
        let state = (scene.pilot_mode, scene.phase);
        let changed = self.last != Some(state);
        self.last = Some(state);
        if !changed && tick % self.every != 0 {
            return Ok(());
        }

        let dolphin = &scene.dolphin;
        let gap = scene
            .closest_wave_gap()
            .map_or_else(|| "none".to_owned(), |gap| format!("{gap:.1}"));
        log::info!(
            "tick {tick:>6} {:?}/{:?} dolphin y={:.1} vy={:.1} waves={} next={gap}",
            scene.pilot_mode,
            scene.phase,
            dolphin.position.y,
            dolphin.velocity.y,
            scene.waves.len(),
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::debug!("presented {} scenes", self.presented);
        Ok(())
    }
}
