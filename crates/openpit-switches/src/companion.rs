//! Companion-app rotary state feed
//!
//! Rotary knobs rest at a detent the HID report stream cannot describe
//! until the knob moves, so resting positions arrive out-of-band from the
//! companion app, with additional latency. The communication channel itself
//! lives outside this SDK; whatever drives it clones a [`CompanionFeed`]
//! and publishes group positions as they arrive.

use crate::{
    ROTARY_GROUP_COUNT, ROTARY_SWITCH_GROUPS, SWITCH_COUNT, SwitchIndex, SwitchesError,
    SwitchesResult,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct FeedInner {
    rotary: Mutex<[u8; SWITCH_COUNT]>,
    groups_seen: Mutex<[bool; ROTARY_GROUP_COUNT]>,
}

/// Shared handle to the slower-arriving rotary positions.
///
/// Clones share state; the device holds one handle, the channel driver
/// holds another.
#[derive(Clone, Default)]
pub struct CompanionFeed {
    inner: Arc<FeedInner>,
}

impl CompanionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once every rotary group has reported a position.
    pub fn is_ready(&self) -> bool {
        self.inner.groups_seen.lock().iter().all(|seen| *seen)
    }

    /// Publish the resting position of one rotary group.
    ///
    /// # Errors
    ///
    /// `InvalidGroup` for an unknown group index, `NotInGroup` when the
    /// switch is not one of that group's detents.
    pub fn publish_group(&self, group: usize, active: SwitchIndex) -> SwitchesResult<()> {
        let members = ROTARY_SWITCH_GROUPS
            .get(group)
            .ok_or(SwitchesError::InvalidGroup(group))?;
        if !members.contains(&active) {
            return Err(SwitchesError::NotInGroup { switch: active, group });
        }

        let mut rotary = self.inner.rotary.lock();
        for member in *members {
            if let Some(slot) = rotary.get_mut(member.index()) {
                *slot = 0;
            }
        }
        if let Some(slot) = rotary.get_mut(active.index()) {
            *slot = 1;
        }
        drop(rotary);

        if let Some(seen) = self.inner.groups_seen.lock().get_mut(group) {
            *seen = true;
        }
        tracing::trace!(group, position = ?active, "companion rotary position published");
        Ok(())
    }

    /// Snapshot of the published rotary lines.
    pub fn rotary_positions(&self) -> [u8; SWITCH_COUNT] {
        *self.inner.rotary.lock()
    }
}
