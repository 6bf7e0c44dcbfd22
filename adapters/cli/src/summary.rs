use std::{fs, path::Path};

use anyhow::{Context, Result};
use dolphin_run_core::{CharacterPose, Event, JumpSample, JumpTrigger, PilotMode};
use serde::Serialize;

/// Totals gathered over a headless run, written as JSON on request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) spawned: u64,
    pub(crate) destroyed: u64,
    pub(crate) manual_jumps: u64,
    pub(crate) imitation_jumps: u64,
    pub(crate) final_mode: PilotMode,
    pub(crate) final_pose: CharacterPose,
    /// Recorded samples, oldest first. Infinite distances encode as `null`.
    pub(crate) memory: Vec<JumpSample>,
}

impl RunSummary {
    /// Folds the events emitted by one command into the totals.
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => self.ticks += 1,
                Event::ObstacleSpawned { .. } => self.spawned += 1,
                Event::ObstacleDestroyed { .. } => self.destroyed += 1,
                Event::Jumped {
                    trigger: JumpTrigger::Manual,
                    ..
                } => self.manual_jumps += 1,
                Event::Jumped {
                    trigger: JumpTrigger::Imitation { .. },
                    ..
                } => self.imitation_jumps += 1,
                Event::PoseUpdated { pose } => self.final_pose = *pose,
                Event::PilotModeChanged { mode } => self.final_mode = *mode,
                Event::SessionPhaseChanged { .. } => {}
            }
        }
    }

    /// Encodes the summary as pretty JSON.
    pub(crate) fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to encode run summary")
    }

    /// Writes the summary as pretty JSON to `path`.
    pub(crate) fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .with_context(|| format!("failed to write run summary to {}", path.display()))
    }
}
