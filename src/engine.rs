//! Engine facade: mode flags, the per-tick poll work, and one-shot commands.
//!
//! [`EngineCore`] owns no scene data. Every operation is handed the host and
//! reads a fresh snapshot from it, so entities added, moved or deleted by the
//! host between calls are always seen.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::beautify::beautify_selection;
use crate::cap::add_caps_selection;
use crate::config::EngineConfig;
use crate::doc::EntityId;
use crate::graph::{build_graph, reachable_from};
use crate::input::{InputSample, ModeFlags};
use crate::radial::RadialController;
use crate::scene::{SceneAccessor, single_selected_node};

/// Outcomes reported back to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    SelectionReplaced(Vec<EntityId>),
    EntitiesUpdated { count: usize },
    PathsDecorated { count: usize },
}

#[derive(Debug, Default)]
pub struct EngineCore {
    pub flags: ModeFlags,
    pub config: EngineConfig,
    radial: RadialController,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    #[must_use]
    pub fn radial(&self) -> &RadialController {
        &self.radial
    }

    // --- Poll ---

    /// One poll firing. Expands the selection when linked-list mode is on,
    /// then refreshes the joystick's related set when joystick mode is on.
    pub fn tick(&mut self, host: &mut impl SceneAccessor) -> Action {
        let action = if self.flags.linked_list { select_reachable(host) } else { Action::None };
        if self.flags.joystick {
            self.radial.refresh_related(host);
        }
        action
    }

    // --- Input ---

    /// Feed one joystick sample. Ignored while joystick mode is off.
    pub fn on_input(&mut self, host: &mut impl SceneAccessor, sample: InputSample) -> Action {
        if !self.flags.joystick {
            debug!(status = ?sample.status, "joystick sample ignored: joystick mode off");
            return Action::None;
        }
        match self.radial.on_sample(host, sample) {
            0 => Action::None,
            count => Action::EntitiesUpdated { count },
        }
    }

    // --- Mode toggles ---

    /// Flip linked-list mode. Returns the new value.
    pub fn toggle_linked_list_mode(&mut self) -> bool {
        self.flags.linked_list = !self.flags.linked_list;
        info!(enabled = self.flags.linked_list, "linked-list mode toggled");
        self.flags.linked_list
    }

    /// Flip joystick mode. Turning it off abandons any gesture in progress.
    pub fn toggle_joystick_mode(&mut self) -> bool {
        self.flags.joystick = !self.flags.joystick;
        if !self.flags.joystick {
            self.radial.cancel();
        }
        info!(enabled = self.flags.joystick, "joystick mode toggled");
        self.flags.joystick
    }

    pub fn toggle_crayon_effect(&mut self) -> bool {
        self.flags.crayon = !self.flags.crayon;
        info!(enabled = self.flags.crayon, "crayon effect toggled");
        self.flags.crayon
    }

    // --- Commands ---

    pub fn beautify_curves(&mut self, host: &mut impl SceneAccessor) -> Action {
        match beautify_selection(host, self.config.bend_scale) {
            0 => Action::None,
            count => Action::EntitiesUpdated { count },
        }
    }

    pub fn add_caps(&mut self, host: &mut impl SceneAccessor) -> Action {
        match add_caps_selection(host, &self.config) {
            0 => Action::None,
            count => Action::PathsDecorated { count },
        }
    }
}

/// Replace a single selected node with everything reachable from it.
///
/// A root with nothing downstream leaves the selection as it is.
pub fn select_reachable(host: &mut impl SceneAccessor) -> Action {
    let Some(root) = single_selected_node(host) else {
        return Action::None;
    };
    let graph = build_graph(&host.list_entities());
    let reachable = reachable_from(&graph, &root.id);
    if reachable.len() <= 1 {
        return Action::None;
    }
    debug!(root = %root.id, count = reachable.len(), "selection expanded to reachable set");
    host.set_selection(reachable.clone());
    Action::SelectionReplaced(reachable)
}
