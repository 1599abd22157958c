use crate::grid::{TileGrid, TILE_SIZE_PX};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// One axis-aligned rectangular body in pixel space. The y axis grows
/// downward, so positive `velocity.y` is falling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec2::default(),
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.position.x + self.width / 2.0,
            y: self.position.y + self.height / 2.0,
        }
    }

    /// Tile coordinates of the body's geometric center. Trigger tiles (door,
    /// key) fire on this point, not on bounding-box overlap.
    pub fn center_tile(&self) -> (i32, i32) {
        let center = self.center();
        (tile_floor(center.x), tile_floor(center.y))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalContact {
    pub on_ceiling: bool,
    pub on_ground: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizontalContact {
    pub on_wall_left: bool,
    pub on_wall_right: bool,
}

fn tile_floor(pixel: f32) -> i32 {
    (pixel / TILE_SIZE_PX as f32).floor() as i32
}

fn is_wall_at(grid: &TileGrid, tx: i32, ty: i32, is_wall: &impl Fn(u8) -> bool) -> bool {
    grid.tile_at(tx, ty).is_some_and(is_wall)
}

/// Probes the tile row just above the body's top edge across every column
/// the box overlaps. Returns the wall's bottom face y, or `None` when clear.
pub fn probe_up(grid: &TileGrid, body: &Body, is_wall: &impl Fn(u8) -> bool) -> Option<f32> {
    let ty = tile_floor(body.position.y - 1.0);
    let from = tile_floor(body.position.x);
    let to = tile_floor(body.position.x + body.width - 1.0);
    for tx in from..=to {
        if is_wall_at(grid, tx, ty, is_wall) {
            return Some(((ty + 1) * TILE_SIZE_PX) as f32);
        }
    }
    None
}

/// Probes the tile row just below the bottom edge. Returns the wall's top
/// face y, or `None` when the body is airborne.
pub fn probe_down(grid: &TileGrid, body: &Body, is_wall: &impl Fn(u8) -> bool) -> Option<f32> {
    let ty = tile_floor(body.position.y + body.height);
    let from = tile_floor(body.position.x);
    let to = tile_floor(body.position.x + body.width - 1.0);
    for tx in from..=to {
        if is_wall_at(grid, tx, ty, is_wall) {
            return Some((ty * TILE_SIZE_PX) as f32);
        }
    }
    None
}

/// Probes the tile column just left of the body. Returns the wall's right
/// face x, or `None` when clear.
pub fn probe_left(grid: &TileGrid, body: &Body, is_wall: &impl Fn(u8) -> bool) -> Option<f32> {
    let tx = tile_floor(body.position.x - 1.0);
    let from = tile_floor(body.position.y);
    let to = tile_floor(body.position.y + body.height - 1.0);
    for ty in from..=to {
        if is_wall_at(grid, tx, ty, is_wall) {
            return Some(((tx + 1) * TILE_SIZE_PX) as f32);
        }
    }
    None
}

/// Probes the tile column just right of the body. Returns the wall's left
/// face x, or `None` when clear.
pub fn probe_right(grid: &TileGrid, body: &Body, is_wall: &impl Fn(u8) -> bool) -> Option<f32> {
    let tx = tile_floor(body.position.x + body.width);
    let from = tile_floor(body.position.y);
    let to = tile_floor(body.position.y + body.height - 1.0);
    for ty in from..=to {
        if is_wall_at(grid, tx, ty, is_wall) {
            return Some((tx * TILE_SIZE_PX) as f32);
        }
    }
    None
}

/// Integrates the vertical axis and corrects against walls. On contact the
/// body ends pixel-exact flush against the tile face and the velocity is
/// clamped toward zero in the wall's direction, never reflected.
pub fn step_vertical(
    grid: &TileGrid,
    body: &mut Body,
    is_wall: &impl Fn(u8) -> bool,
) -> VerticalContact {
    body.position.y += body.velocity.y;
    let mut contact = VerticalContact::default();

    if let Some(ceiling_face) = probe_up(grid, body, is_wall) {
        body.position.y = ceiling_face;
        body.velocity.y = body.velocity.y.max(0.0);
        contact.on_ceiling = true;
    }
    if let Some(ground_face) = probe_down(grid, body, is_wall) {
        body.position.y = ground_face - body.height;
        body.velocity.y = body.velocity.y.min(0.0);
        contact.on_ground = true;
    }
    contact
}

/// Horizontal counterpart of [`step_vertical`]. Always resolved after the
/// vertical axis within one simulation step.
pub fn step_horizontal(
    grid: &TileGrid,
    body: &mut Body,
    is_wall: &impl Fn(u8) -> bool,
) -> HorizontalContact {
    body.position.x += body.velocity.x;
    let mut contact = HorizontalContact::default();

    if let Some(wall_face) = probe_left(grid, body, is_wall) {
        body.position.x = wall_face;
        body.velocity.x = body.velocity.x.max(0.0);
        contact.on_wall_left = true;
    }
    if let Some(wall_face) = probe_right(grid, body, is_wall) {
        body.position.x = wall_face - body.width;
        body.velocity.x = body.velocity.x.min(0.0);
        contact.on_wall_right = true;
    }
    contact
}
