// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use super::DisplayScale;
use crate::MachineError;

/// Size of the machine's memory image, in bytes.
pub const MEMORY_SIZE: usize = 48 * 1024;
pub const DEFAULT_FPS: f64 = 50.0;
/// Bumped whenever [`MachineState`] changes shape.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Everything a snapshot captures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub memory: Vec<u8>,
    pub frame_count: u64,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            frame_count: 0,
        }
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    state: &'a MachineState,
}

#[derive(Deserialize)]
struct Snapshot {
    format_version: u32,
    state: MachineState,
}

impl MachineState {
    /// # Errors
    ///
    /// [`MachineError::Snapshot`] if serialization fails.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, MachineError> {
        let snapshot = SnapshotRef {
            format_version: SNAPSHOT_FORMAT_VERSION,
            state: self,
        };
        serde_json::to_vec(&snapshot).map_err(|error| MachineError::Snapshot(error.to_string()))
    }

    /// # Errors
    ///
    /// [`MachineError::Snapshot`] if `data` can't be parsed, was written by a different
    /// format version, or holds a memory image of the wrong size.
    pub fn from_snapshot(data: &[u8]) -> Result<Self, MachineError> {
        let snapshot: Snapshot = serde_json::from_slice(data)
            .map_err(|error| MachineError::Snapshot(error.to_string()))?;

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(MachineError::Snapshot(format!(
                "unsupported format version {}, expected {SNAPSHOT_FORMAT_VERSION}",
                snapshot.format_version
            )));
        }
        if snapshot.state.memory.len() != MEMORY_SIZE {
            return Err(MachineError::Snapshot(format!(
                "memory image is {} bytes, expected {MEMORY_SIZE}",
                snapshot.state.memory.len()
            )));
        }

        Ok(snapshot.state)
    }
}

/// Settings and attached devices. Not part of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineStatus {
    pub fps: f64,
    pub ula_accuracy: bool,
    pub displays: Vec<DisplayScale>,
    pub audio_receiver_count: usize,
    pub reset_count: u64,
    pub frame_count: u64,
}

impl Default for MachineStatus {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            ula_accuracy: true,
            displays: vec![],
            audio_receiver_count: 0,
            reset_count: 0,
            frame_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_snapshot_restores_state() {
        let mut state = MachineState::default();
        state.memory[0x4000] = 0xAA;
        state.frame_count = 7;

        let data = state.to_snapshot().unwrap();

        assert_eq!(MachineState::from_snapshot(&data).unwrap(), state);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let result = MachineState::from_snapshot(b"not a snapshot");
        assert!(matches!(result, Err(MachineError::Snapshot(_))));
    }

    #[test]
    fn test_snapshot_rejects_other_version() {
        let data = serde_json::json!({
            "format_version": SNAPSHOT_FORMAT_VERSION + 1,
            "state": { "memory": vec![0u8; MEMORY_SIZE], "frame_count": 0 }
        })
        .to_string();

        let Err(MachineError::Snapshot(message)) = MachineState::from_snapshot(data.as_bytes())
        else {
            panic!("expected a snapshot error");
        };
        assert!(message.contains("format version"));
    }

    #[test]
    fn test_snapshot_rejects_short_memory() {
        let data = serde_json::json!({
            "format_version": SNAPSHOT_FORMAT_VERSION,
            "state": { "memory": [0, 1, 2], "frame_count": 0 }
        })
        .to_string();

        let Err(MachineError::Snapshot(message)) = MachineState::from_snapshot(data.as_bytes())
        else {
            panic!("expected a snapshot error");
        };
        assert!(message.contains("3 bytes"));
    }
}
