use thiserror::Error;
use tracing::info;

/// Every capability the player can sacrifice. The set is closed; menus
/// iterate [`Feature::ALL`] so the listing order is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feature {
    Gravity,
    Jump,
    Collisions,
    Rendering,
    Keys,
    Locks,
    Player,
    Left,
    Right,
    Friction,
    Sprites,
    Windows,
    Animations,
    Tutorial,
    Game,
}

pub(crate) const FEATURE_COUNT: usize = 15;

impl Feature {
    pub(crate) const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Gravity,
        Feature::Jump,
        Feature::Collisions,
        Feature::Rendering,
        Feature::Keys,
        Feature::Locks,
        Feature::Player,
        Feature::Left,
        Feature::Right,
        Feature::Friction,
        Feature::Sprites,
        Feature::Windows,
        Feature::Animations,
        Feature::Tutorial,
        Feature::Game,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Feature::Gravity => "gravity",
            Feature::Jump => "jump",
            Feature::Collisions => "collisions",
            Feature::Rendering => "rendering",
            Feature::Keys => "keys",
            Feature::Locks => "locks",
            Feature::Player => "player",
            Feature::Left => "left",
            Feature::Right => "right",
            Feature::Friction => "friction",
            Feature::Sprites => "sprites",
            Feature::Windows => "windows",
            Feature::Animations => "animations",
            Feature::Tutorial => "tutorial",
            Feature::Game => "game",
        }
    }

    const fn index(self) -> usize {
        match self {
            Feature::Gravity => 0,
            Feature::Jump => 1,
            Feature::Collisions => 2,
            Feature::Rendering => 3,
            Feature::Keys => 4,
            Feature::Locks => 5,
            Feature::Player => 6,
            Feature::Left => 7,
            Feature::Right => 8,
            Feature::Friction => 9,
            Feature::Sprites => 10,
            Feature::Windows => 11,
            Feature::Animations => 12,
            Feature::Tutorial => 13,
            Feature::Game => 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum FeatureSetError {
    #[error("sacrifice history is empty")]
    EmptyHistory,
}

/// The single source of truth for what the game currently does. Disabling a
/// feature records which level it was sacrificed on, so a retreat can undo
/// exactly that level's sacrifices.
pub(crate) struct FeatureSet {
    enabled: [bool; FEATURE_COUNT],
    history: Vec<(Feature, usize)>,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self {
            enabled: [true; FEATURE_COUNT],
            history: Vec::new(),
        }
    }
}

impl FeatureSet {
    pub(crate) fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled[feature.index()]
    }

    /// Features still enabled, in the fixed listing order.
    pub(crate) fn enabled_features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|&feature| self.is_enabled(feature))
            .collect()
    }

    pub(crate) fn sacrifice_count(&self) -> usize {
        self.history.len()
    }

    /// Disables `feature` and records the sacrifice against `level_index`.
    /// Disabling an already-disabled feature is a no-op so the history never
    /// holds duplicate live entries.
    pub(crate) fn disable(&mut self, feature: Feature, level_index: usize) {
        if !self.is_enabled(feature) {
            return;
        }
        self.enabled[feature.index()] = false;
        self.history.push((feature, level_index));
        info!(
            feature = feature.label(),
            level = level_index,
            "feature_sacrificed"
        );
    }

    /// Pops the most recent sacrifice and re-enables it.
    pub(crate) fn restore_last(&mut self) -> Result<Feature, FeatureSetError> {
        let (feature, level_index) = self.history.pop().ok_or(FeatureSetError::EmptyHistory)?;
        self.enabled[feature.index()] = true;
        info!(
            feature = feature.label(),
            level = level_index,
            "sacrifice_restored"
        );
        Ok(feature)
    }

    /// Restores, newest first, every sacrifice recorded on `level_index`.
    /// This is the retreat rule: leaving a level gives back exactly what was
    /// given up on it. Sacrifices from deeper in the history are untouched.
    pub(crate) fn restore_for_level(&mut self, level_index: usize) -> Vec<Feature> {
        let mut restored = Vec::new();
        while self
            .history
            .last()
            .is_some_and(|&(_, level)| level == level_index)
        {
            if let Ok(feature) = self.restore_last() {
                restored.push(feature);
            }
        }
        restored
    }
}
