use engine::{step_horizontal, step_vertical, Body, InputAction, InputSnapshot, TileGrid, Vec2};

use super::features::{Feature, FeatureSet};
use super::state::{
    is_wall_tile, GRAVITY, PLAYER_HEIGHT, PLAYER_JUMP, PLAYER_SPEED, PLAYER_WIDTH, TILE_KEY,
};

/// The player's body plus its per-tick trigger state. Every behavior is
/// gated by the feature set; with `player` sacrificed the update is a no-op
/// and the body freezes where it is.
pub(crate) struct Player {
    pub(crate) body: Body,
    door_tile: (i32, i32),
    on_ground: bool,
    pub(crate) touching_door: bool,
    pub(crate) touching_key: bool,
    walk_ticks: u32,
    kick_pending: bool,
}

impl Player {
    pub(crate) fn new(spawn_px: Vec2, door_tile: (i32, i32)) -> Self {
        Self {
            body: Body::new(spawn_px, PLAYER_WIDTH, PLAYER_HEIGHT),
            door_tile,
            on_ground: false,
            touching_door: false,
            touching_key: false,
            walk_ticks: 0,
            kick_pending: false,
        }
    }

    /// Tick counter while directional input is held, used for the walk bob.
    pub(crate) fn walk_ticks(&self) -> u32 {
        self.walk_ticks
    }

    pub(crate) fn update(&mut self, input: &InputSnapshot, features: &FeatureSet, grid: &TileGrid) {
        if !features.is_enabled(Feature::Player) {
            return;
        }

        let mut intent = 0.0;
        if features.is_enabled(Feature::Left) && input.is_down(InputAction::Left) {
            intent -= PLAYER_SPEED;
        }
        if features.is_enabled(Feature::Right) && input.is_down(InputAction::Right) {
            intent += PLAYER_SPEED;
        }
        if intent != 0.0 {
            self.walk_ticks = self.walk_ticks.wrapping_add(1);
        } else {
            self.walk_ticks = 0;
        }
        // A fresh wall-kick owns the horizontal velocity for one step;
        // intent and friction take back over on the tick after it integrates.
        if self.kick_pending {
            self.kick_pending = false;
        } else if intent != 0.0 {
            self.body.velocity.x = intent;
        } else if features.is_enabled(Feature::Friction) {
            self.body.velocity.x = 0.0;
        }

        if features.is_enabled(Feature::Collisions) {
            let vertical = step_vertical(grid, &mut self.body, &is_wall_tile);
            self.on_ground = vertical.on_ground;
            if vertical.on_ground {
                // Ground contact is the only moment a jump impulse applies.
                if features.is_enabled(Feature::Jump) && input.is_down(InputAction::Up) {
                    self.body.velocity.y = -PLAYER_JUMP;
                }
            } else if features.is_enabled(Feature::Gravity) {
                self.body.velocity.y += GRAVITY;
            }

            let horizontal = step_horizontal(grid, &mut self.body, &is_wall_tile);
            // Without gravity there is no ground to jump from; a held jump
            // against a side wall kicks away from it instead.
            if !features.is_enabled(Feature::Gravity)
                && features.is_enabled(Feature::Jump)
                && input.is_down(InputAction::Up)
            {
                if horizontal.on_wall_left {
                    self.body.velocity.x = PLAYER_JUMP;
                    self.kick_pending = true;
                } else if horizontal.on_wall_right {
                    self.body.velocity.x = -PLAYER_JUMP;
                    self.kick_pending = true;
                }
            }
        } else {
            self.body.position.y += self.body.velocity.y;
            self.body.position.x += self.body.velocity.x;
            self.on_ground = false;
            if features.is_enabled(Feature::Gravity) {
                self.body.velocity.y += GRAVITY;
            }
        }

        let center = self.body.center_tile();
        self.touching_door = center == self.door_tile;
        self.touching_key = grid.tile_at(center.0, center.1) == Some(TILE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{TILE_BLOCK, TILE_EMPTY};

    fn open_grid() -> TileGrid {
        TileGrid::filled(16, 16, TILE_EMPTY)
    }

    // Open 16x16 grid with one solid row at tile y = 6.
    fn floor_grid() -> TileGrid {
        let mut grid = open_grid();
        for tx in 0..16 {
            grid.set(tx, 6, TILE_BLOCK);
        }
        grid
    }

    fn grounded_player() -> Player {
        // Standing flush on the y = 6 floor row.
        Player::new(Vec2 { x: 16.0, y: 40.0 }, (15, 15))
    }

    fn no_gravity() -> FeatureSet {
        let mut features = FeatureSet::default();
        features.disable(Feature::Gravity, 1);
        features
    }

    #[test]
    fn walking_right_reaches_the_door_on_the_expected_tick() {
        let grid = open_grid();
        let features = no_gravity();
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (10, 2));
        let input = InputSnapshot::empty().with_action_down(InputAction::Right, true);

        let mut ticks = 0;
        while !player.touching_door && ticks < 200 {
            player.update(&input, &features, &grid);
            ticks += 1;
        }

        // Center starts at x = 18 and must cross x = 80 into tile 10.
        assert!(player.touching_door);
        assert_eq!(ticks, 62);
        assert_eq!(player.body.center_tile(), (10, 2));
    }

    #[test]
    fn jump_impulse_only_fires_with_the_jump_feature() {
        let grid = floor_grid();
        let input = InputSnapshot::empty().with_action_down(InputAction::Up, true);

        let mut features = FeatureSet::default();
        features.disable(Feature::Jump, 1);
        let mut player = grounded_player();
        player.update(&input, &features, &grid);
        assert_eq!(player.body.velocity.y, 0.0);

        assert_eq!(features.restore_last(), Ok(Feature::Jump));
        let mut player = grounded_player();
        player.update(&input, &features, &grid);
        assert_eq!(player.body.velocity.y, -PLAYER_JUMP);
    }

    #[test]
    fn airborne_player_accumulates_gravity() {
        let grid = open_grid();
        let features = FeatureSet::default();
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (15, 15));

        player.update(&InputSnapshot::empty(), &features, &grid);
        assert_eq!(player.body.velocity.y, GRAVITY);
        player.update(&InputSnapshot::empty(), &features, &grid);
        assert_eq!(player.body.velocity.y, GRAVITY * 2.0);
    }

    #[test]
    fn sacrificing_gravity_freezes_free_fall() {
        let grid = open_grid();
        let features = no_gravity();
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (15, 15));

        for _ in 0..10 {
            player.update(&InputSnapshot::empty(), &features, &grid);
        }
        assert_eq!(player.body.velocity.y, 0.0);
        assert_eq!(player.body.position.y, 16.0);
    }

    #[test]
    fn sacrificing_collisions_passes_through_walls() {
        let grid = TileGrid::filled(16, 16, TILE_BLOCK);
        let mut features = no_gravity();
        features.disable(Feature::Collisions, 1);
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (15, 15));
        let input = InputSnapshot::empty().with_action_down(InputAction::Right, true);

        for _ in 0..8 {
            player.update(&input, &features, &grid);
        }
        assert_eq!(player.body.position.x, 24.0);
    }

    #[test]
    fn sacrificing_player_freezes_the_body_entirely() {
        let grid = open_grid();
        let mut features = FeatureSet::default();
        features.disable(Feature::Player, 1);
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (15, 15));
        let input = InputSnapshot::empty().with_action_down(InputAction::Right, true);

        player.update(&input, &features, &grid);
        assert_eq!(player.body.position, Vec2 { x: 16.0, y: 16.0 });
        assert_eq!(player.body.velocity.y, 0.0);
    }

    #[test]
    fn direction_features_gate_their_axis() {
        let grid = open_grid();
        let mut features = no_gravity();
        features.disable(Feature::Left, 1);
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (15, 15));

        let left = InputSnapshot::empty().with_action_down(InputAction::Left, true);
        player.update(&left, &features, &grid);
        assert_eq!(player.body.position.x, 16.0);

        let right = InputSnapshot::empty().with_action_down(InputAction::Right, true);
        player.update(&right, &features, &grid);
        assert_eq!(player.body.position.x, 17.0);
    }

    #[test]
    fn without_friction_horizontal_velocity_persists_after_release() {
        let grid = open_grid();
        let mut features = no_gravity();
        features.disable(Feature::Friction, 1);
        let mut player = Player::new(Vec2 { x: 16.0, y: 16.0 }, (15, 15));

        let right = InputSnapshot::empty().with_action_down(InputAction::Right, true);
        player.update(&right, &features, &grid);
        player.update(&InputSnapshot::empty(), &features, &grid);
        assert_eq!(player.body.position.x, 18.0);

        // With friction restored, releasing input stops the slide.
        assert_eq!(features.restore_last(), Ok(Feature::Friction));
        player.update(&InputSnapshot::empty(), &features, &grid);
        assert_eq!(player.body.position.x, 18.0);
        assert_eq!(player.body.velocity.x, 0.0);
    }

    #[test]
    fn wall_kick_fires_only_without_gravity() {
        // Wall column at tile x = 1; the player hugs its right face.
        let mut grid = open_grid();
        for ty in 0..16 {
            grid.set(1, ty, TILE_BLOCK);
        }
        let input = InputSnapshot::empty()
            .with_action_down(InputAction::Left, true)
            .with_action_down(InputAction::Up, true);

        let features = no_gravity();
        let mut player = Player::new(Vec2 { x: 17.0, y: 40.0 }, (15, 15));
        player.update(&input, &features, &grid);
        assert_eq!(player.body.position.x, 16.0);
        assert_eq!(player.body.velocity.x, PLAYER_JUMP);

        // With gravity on, pressing into the wall never kicks.
        let features = FeatureSet::default();
        let mut player = Player::new(Vec2 { x: 17.0, y: 40.0 }, (15, 15));
        player.update(&input, &features, &grid);
        assert!(player.body.velocity.x <= 0.0);
    }

    #[test]
    fn wall_kick_displaces_the_player_despite_friction() {
        // Wall column at tile x = 1; the player starts flush on its right
        // face with friction still enabled and only jump held.
        let mut grid = open_grid();
        for ty in 0..16 {
            grid.set(1, ty, TILE_BLOCK);
        }
        let features = no_gravity();
        let mut player = Player::new(Vec2 { x: 16.0, y: 40.0 }, (15, 15));
        let input = InputSnapshot::empty().with_action_down(InputAction::Up, true);

        for _ in 0..10 {
            player.update(&input, &features, &grid);
        }

        // The kick integrates for one full step before friction resumes.
        assert_eq!(player.body.position.x, 16.0 + PLAYER_JUMP);
        assert_eq!(player.body.velocity.x, 0.0);
    }

    #[test]
    fn center_point_sampling_detects_the_key_tile() {
        let mut grid = open_grid();
        grid.set(5, 5, TILE_KEY);
        let features = no_gravity();

        // Body left edge inside tile 5 but center still in tile 4.
        let mut player = Player::new(Vec2 { x: 37.0, y: 40.0 }, (15, 15));
        player.update(&InputSnapshot::empty(), &features, &grid);
        assert!(!player.touching_key);

        let right = InputSnapshot::empty().with_action_down(InputAction::Right, true);
        player.update(&right, &features, &grid);
        assert!(player.touching_key);
    }
}
