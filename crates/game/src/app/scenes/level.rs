use engine::{
    Frame, InputAction, InputSnapshot, Layer, StackCommand, TileGrid, Vec2, TILE_SIZE_PX,
};
use tracing::{error, info, warn};

use crate::app::features::Feature;
use crate::app::levels::{load_level, LevelError};
use crate::app::player::Player;
use crate::app::state::{
    GameState, GAME_TILES_H, GAME_TILES_W, PAUSE_HOLD_TICKS, TILE_BLOCK, TILE_EMPTY, TILE_KEY,
    TILE_LOCK, TILE_LOCK_OPEN,
};

use super::{kill_switch, EndingScene, PauseMenu, SacrificeMenu, TutorialMenu};

// Out-of-bounds margin in tiles around the level slice.
const BOUNDS_MARGIN: i32 = 2;

fn in_bounds(tile_x: i32, tile_y: i32) -> bool {
    let max_x = GAME_TILES_W as i32 + BOUNDS_MARGIN - 1;
    let max_y = GAME_TILES_H as i32 + BOUNDS_MARGIN - 1;
    (-BOUNDS_MARGIN..=max_x).contains(&tile_x) && (-BOUNDS_MARGIN..=max_y).contains(&tile_y)
}

/// One playable level. Entry loads the grid slice and, for every level after
/// the first, forces a sacrifice by pushing the menu on top; tutorial pages
/// stack above that while the `tutorial` feature survives.
pub(crate) struct LevelScene {
    level_index: usize,
    grid: TileGrid,
    player: Player,
    door_tile: (i32, i32),
    pause_hold_ticks: u32,
}

impl LevelScene {
    pub(crate) fn new(level_index: usize) -> Self {
        Self {
            level_index,
            grid: TileGrid::filled(GAME_TILES_W, GAME_TILES_H, TILE_EMPTY),
            player: Player::new(Vec2::default(), (-1, -1)),
            door_tile: (-1, -1),
            pause_hold_ticks: 0,
        }
    }

    pub(crate) fn boxed(level_index: usize) -> Box<dyn Layer<GameState>> {
        Box::new(Self::new(level_index))
    }

    fn load(&mut self, ctx: &mut GameState) -> Result<Vec<StackCommand<GameState>>, LevelError> {
        let loaded = load_level(&ctx.bank, self.level_index, &ctx.features)?;
        self.grid = loaded.grid;
        self.player = Player::new(loaded.spawn_px, loaded.door_tile);
        self.door_tile = loaded.door_tile;
        self.pause_hold_ticks = 0;
        info!(
            level = self.level_index,
            name = ctx.bank.level_name(self.level_index),
            "scene_loaded"
        );

        let mut commands = Vec::new();
        if self.level_index > 0 {
            commands.push(StackCommand::PushMenu(SacrificeMenu::boxed(
                self.level_index,
            )));
        }
        let pages = ctx.bank.tutorial_pages(self.level_index);
        if !pages.is_empty() && ctx.features.is_enabled(Feature::Tutorial) {
            commands.push(StackCommand::PushMenu(TutorialMenu::boxed(pages.to_vec())));
        }
        Ok(commands)
    }

    fn draw_tiles(&self, frame: &mut Frame) {
        for ty in 0..GAME_TILES_H as i32 {
            for tx in 0..GAME_TILES_W as i32 {
                let Some(tile) = self.grid.tile_at(tx, ty) else {
                    continue;
                };
                let px = tx * TILE_SIZE_PX;
                let py = ty * TILE_SIZE_PX;
                match tile {
                    TILE_BLOCK => frame.fill_rect(px, py, TILE_SIZE_PX, TILE_SIZE_PX, 5),
                    TILE_KEY => frame.fill_rect(px + 2, py + 2, 4, 4, 10),
                    TILE_LOCK => {
                        frame.fill_rect(px, py, TILE_SIZE_PX, TILE_SIZE_PX, 4);
                        frame.fill_rect(px + 3, py + 3, 2, 2, 0);
                    }
                    TILE_LOCK_OPEN => frame.rect_outline(px, py, TILE_SIZE_PX, TILE_SIZE_PX, 4),
                    _ => {}
                }
            }
        }
        // The door sentinel was cleared from the grid at load; draw it from
        // its remembered tile.
        let (door_x, door_y) = self.door_tile;
        frame.rect_outline(
            door_x * TILE_SIZE_PX + 1,
            door_y * TILE_SIZE_PX,
            TILE_SIZE_PX - 2,
            TILE_SIZE_PX,
            9,
        );
    }

    fn draw_player(&self, frame: &mut Frame, ctx: &GameState) {
        let x = self.player.body.position.x as i32;
        let mut y = self.player.body.position.y as i32;
        if ctx.features.is_enabled(Feature::Animations)
            && self.player.walk_ticks() > 0
            && (self.player.walk_ticks() / 4) % 2 == 1
        {
            y -= 1;
        }
        if ctx.features.is_enabled(Feature::Sprites) {
            frame.fill_rect(x, y, self.player.body.width as i32, 8, 8);
            frame.fill_rect(x, y, self.player.body.width as i32, 3, 15);
        } else {
            frame.fill_rect(x, y, self.player.body.width as i32, 8, 7);
        }
    }
}

impl Layer<GameState> for LevelScene {
    fn name(&self) -> &'static str {
        "level_scene"
    }

    fn enter(&mut self, ctx: &mut GameState) -> Vec<StackCommand<GameState>> {
        match self.load(ctx) {
            Ok(commands) => commands,
            Err(level_error) => {
                error!(level = self.level_index, error = %level_error, "level_fault");
                vec![StackCommand::Quit]
            }
        }
    }

    fn update(
        &mut self,
        input: &InputSnapshot,
        ctx: &mut GameState,
    ) -> Vec<StackCommand<GameState>> {
        if let Some(commands) = kill_switch(ctx) {
            return commands;
        }

        if input.is_down(InputAction::Pause) {
            self.pause_hold_ticks += 1;
            if self.pause_hold_ticks >= PAUSE_HOLD_TICKS {
                self.pause_hold_ticks = 0;
                return vec![StackCommand::PushMenu(PauseMenu::boxed(self.level_index))];
            }
        } else {
            self.pause_hold_ticks = 0;
        }

        self.player.update(input, &ctx.features, &self.grid);

        if self.player.touching_key && ctx.features.is_enabled(Feature::Keys) {
            let keys = self.grid.clear_all(TILE_KEY, TILE_EMPTY);
            let locks = self.grid.clear_all(TILE_LOCK, TILE_LOCK_OPEN);
            info!(level = self.level_index, keys, locks, "key_collected");
        }

        if self.player.touching_door {
            if ctx.bank.is_last_level(self.level_index) {
                let ending = if ctx.features.is_enabled(Feature::Tutorial) {
                    EndingScene::credits()
                } else {
                    EndingScene::endgame()
                };
                return vec![StackCommand::ReplaceScene(Box::new(ending))];
            }
            return vec![StackCommand::ReplaceScene(LevelScene::boxed(
                self.level_index + 1,
            ))];
        }

        let (tile_x, tile_y) = self.player.body.center_tile();
        if !in_bounds(tile_x, tile_y) {
            warn!(
                level = self.level_index,
                tile_x, tile_y, "out_of_bounds"
            );
            if ctx.features.restore_last().is_err() {
                warn!(level = self.level_index, "no_sacrifice_to_restore");
            }
            return vec![StackCommand::ReplaceScene(LevelScene::boxed(
                self.level_index,
            ))];
        }

        Vec::new()
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameState) {
        if !ctx.features.is_enabled(Feature::Rendering) {
            return;
        }
        self.draw_tiles(frame);
        self.draw_player(frame, ctx);
    }
}
