use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Descriptors ──────────────────────────────────────────────────────────────

/// Shape of one animation clip as reported by the external asset layer:
/// how many images it has, how many simulation frames each image holds for,
/// and whether it loops. The kernel never touches pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDesc {
    pub image_count: u32,
    pub image_duration: u32,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("no animation descriptor registered under '{key}'")]
    Missing { key: String },
}

/// Descriptor lookup keyed `"{entity_kind}/{action}"`, e.g. `"player/run"`.
#[derive(Clone, Debug, Default)]
pub struct AnimationLibrary {
    descs: HashMap<String, AnimationDesc>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, desc: AnimationDesc) {
        self.descs.insert(key.into(), desc);
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDesc> {
        self.descs.get(key)
    }

    /// Resolve the descriptors an entity kind needs for all of `actions`.
    /// A missing descriptor is a content bug and fails the whole load; the
    /// kernel never substitutes a placeholder clip.
    pub fn action_table(
        &self,
        kind: &str,
        actions: &[&str],
    ) -> Result<ActionTable, AnimationError> {
        let mut table = HashMap::new();
        for action in actions {
            let key = format!("{kind}/{action}");
            let desc = self
                .descs
                .get(&key)
                .copied()
                .ok_or(AnimationError::Missing { key })?;
            table.insert((*action).to_string(), desc);
        }
        Ok(ActionTable { table })
    }
}

/// The validated set of clips one entity can switch between. Built once at
/// level load, so runtime action switches cannot miss.
#[derive(Clone, Debug)]
pub struct ActionTable {
    table: HashMap<String, AnimationDesc>,
}

impl ActionTable {
    /// Single anonymous clip, for effects that never switch action.
    pub fn single(desc: AnimationDesc) -> Self {
        let mut table = HashMap::new();
        table.insert("default".to_string(), desc);
        Self { table }
    }

    fn get(&self, action: &str) -> AnimationDesc {
        *self
            .table
            .get(action)
            .unwrap_or_else(|| panic!("action '{action}' missing from validated table"))
    }
}

// ── AnimationState ───────────────────────────────────────────────────────────

/// Per-entity animation clock: current action, per-image frame counter and
/// image index, plus a monotonic total-frame counter for drift effects.
#[derive(Clone, Debug)]
pub struct AnimationState {
    actions: ActionTable,
    action: String,
    desc: AnimationDesc,
    frame: u32,
    image: u32,
    total_frames: u32,
    done: bool,
}

impl AnimationState {
    pub fn new(actions: ActionTable, initial: &str) -> Self {
        let desc = actions.get(initial);
        Self {
            actions,
            action: initial.to_string(),
            desc,
            frame: 0,
            image: 0,
            total_frames: 0,
            done: false,
        }
    }

    /// State over a lone clip (particles and other one-shot effects).
    pub fn single(desc: AnimationDesc) -> Self {
        Self::new(ActionTable::single(desc), "default")
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Switch clips. A self-transition is a no-op; anything else resets the
    /// clock and the `done` flag.
    pub fn set_action(&mut self, name: &str) {
        if name == self.action {
            return;
        }
        self.desc = self.actions.get(name);
        self.action = name.to_string();
        self.frame = 0;
        self.image = 0;
        self.total_frames = 0;
        self.done = false;
    }

    /// Tick the clock one simulation frame. A finished non-looping clip
    /// holds on its last image.
    pub fn advance(&mut self) {
        if self.done {
            return;
        }
        self.frame += 1;
        self.total_frames += 1;
        if self.frame >= self.desc.image_duration.max(1) {
            self.frame = 0;
            if self.image + 1 < self.desc.image_count {
                self.image += 1;
            } else if self.desc.looping {
                self.image = 0;
            } else {
                self.done = true;
            }
        }
    }

    /// Index of the image the renderer should show right now.
    pub fn image_index(&self) -> u32 {
        self.image
    }

    /// Frames advanced since the current action started; monotonic within a
    /// clip's lifetime.
    pub fn frames_elapsed(&self) -> u32 {
        self.total_frames
    }

    /// True once a non-looping clip has played through.
    pub fn is_done(&self) -> bool {
        self.done
    }
}
