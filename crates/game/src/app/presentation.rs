use engine::{text_height_px, text_width_px, DrawList, Rgba};

use crate::sim::{Facing, FrameSnapshot, Phase, Rect, Recipe, ResourceKind, Tile};

const SKY: Rgba = [120, 180, 255, 255];
const NIGHT_SKY: Rgba = [10, 10, 30, 255];
const SAND: Rgba = [210, 200, 120, 255];
const BROWN: Rgba = [120, 72, 0, 255];
const GREY: Rgba = [140, 140, 140, 255];
const BLACK: Rgba = [0, 0, 0, 255];
const WHITE: Rgba = [255, 255, 255, 255];
const RED: Rgba = [200, 0, 0, 255];
const PLAYER_BLUE: Rgba = [50, 80, 255, 255];
const ZOMBIE_GREEN: Rgba = [0, 200, 0, 255];
const NIGHT_TINT: Rgba = [0, 0, 0, 120];
const DAY_TINT: Rgba = [0, 0, 0, 30];

const HUD_SCALE: i32 = 3;
const HUD_MARGIN: i32 = 10;
const HUD_LINE_STEP: i32 = 25;
const MENU_WIDTH: i32 = 400;
const MENU_HEIGHT: i32 = 120;
const MENU_TOP: i32 = 40;
const MENU_SCALE: i32 = 2;
const TITLE_SCALE: i32 = 8;
const EYE_SIZE: i32 = 4;

/// Overlay state owned by the scene rather than the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HudState {
    pub(crate) crafting_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) width: i32,
    pub(crate) height: i32,
}

pub(crate) fn build_frame(
    snapshot: &FrameSnapshot,
    hud: HudState,
    viewport: Viewport,
    frame: &mut DrawList,
) {
    let night = snapshot.phase == Phase::Night;
    frame.clear(if night { NIGHT_SKY } else { SKY });

    for visible in &snapshot.tiles {
        let color = match visible.tile {
            Tile::Air => continue,
            Tile::Dirt => SAND,
            Tile::Wood => BROWN,
            Tile::Stone => GREY,
            Tile::Wall => BLACK,
        };
        fill_world_rect(frame, &visible.rect, snapshot.camera_x, color);
    }

    draw_player(frame, snapshot);
    for zombie in &snapshot.zombies {
        fill_world_rect(frame, zombie, snapshot.camera_x, ZOMBIE_GREEN);
    }

    frame.tint(if night { NIGHT_TINT } else { DAY_TINT });
    draw_hud(frame, snapshot, viewport);
    if hud.crafting_open {
        draw_crafting_menu(frame, viewport);
    }
    if snapshot.game_over {
        draw_game_over(frame, viewport);
    }
}

fn fill_world_rect(frame: &mut DrawList, rect: &Rect, camera_x: f32, color: Rgba) {
    frame.fill_rect(
        (rect.x - camera_x).floor() as i32,
        rect.y.floor() as i32,
        rect.w as i32,
        rect.h as i32,
        color,
    );
}

fn draw_player(frame: &mut DrawList, snapshot: &FrameSnapshot) {
    let body = &snapshot.player;
    fill_world_rect(frame, body, snapshot.camera_x, PLAYER_BLUE);

    let left = (body.x - snapshot.camera_x).floor() as i32;
    let eye_x = match snapshot.facing {
        Facing::Left => left + EYE_SIZE,
        Facing::Right => left + body.w as i32 - 2 * EYE_SIZE,
    };
    frame.fill_rect(
        eye_x,
        body.y.floor() as i32 + 2 * EYE_SIZE,
        EYE_SIZE,
        EYE_SIZE,
        WHITE,
    );
}

fn draw_hud(frame: &mut DrawList, snapshot: &FrameSnapshot, viewport: Viewport) {
    let inventory = &snapshot.inventory;
    let lines = [
        format!("HP: {}", snapshot.health),
        format!("Wood: {}", inventory.wood),
        format!("Stone: {}", inventory.stone),
        format!("StoneWalls: {}", inventory.stone_wall),
        format!("WoodWalls: {}", inventory.wood_wall),
    ];
    for (index, line) in lines.into_iter().enumerate() {
        frame.text(
            HUD_MARGIN,
            HUD_MARGIN + index as i32 * HUD_LINE_STEP,
            line,
            HUD_SCALE,
            WHITE,
        );
    }

    let label = snapshot.phase.label();
    let color = match snapshot.phase {
        Phase::Day => WHITE,
        Phase::Night => RED,
    };
    frame.text(
        viewport.width - HUD_MARGIN - text_width_px(label, HUD_SCALE),
        HUD_MARGIN,
        label,
        HUD_SCALE,
        color,
    );
}

fn recipe_line(index: usize, recipe: Recipe) -> String {
    let ingredient = match recipe.ingredient() {
        ResourceKind::Wood => "wood",
        ResourceKind::Stone => "stone",
    };
    format!(
        "{}) {} (cost: {} {}) -> +1",
        index + 1,
        recipe.label(),
        recipe.cost(),
        ingredient
    )
}

fn draw_crafting_menu(frame: &mut DrawList, viewport: Viewport) {
    let x = viewport.width / 2 - MENU_WIDTH / 2;
    frame.fill_rect(x, MENU_TOP, MENU_WIDTH, MENU_HEIGHT, BLACK);
    frame.outline_rect(x, MENU_TOP, MENU_WIDTH, MENU_HEIGHT, 2, WHITE);

    let mut lines = vec!["CRAFTING (press 1/2):".to_string()];
    lines.extend(
        Recipe::ALL
            .iter()
            .enumerate()
            .map(|(index, recipe)| recipe_line(index, *recipe)),
    );
    for (index, line) in lines.into_iter().enumerate() {
        frame.text(
            x + HUD_MARGIN,
            MENU_TOP + HUD_MARGIN + index as i32 * HUD_LINE_STEP,
            line,
            MENU_SCALE,
            WHITE,
        );
    }
}

fn draw_game_over(frame: &mut DrawList, viewport: Viewport) {
    let title = "YOU DIED";
    let hint = "Press R to restart or ESC to quit";
    let center_x = viewport.width / 2;
    let center_y = viewport.height / 2;

    frame.text(
        center_x - text_width_px(title, TITLE_SCALE) / 2,
        center_y - text_height_px(TITLE_SCALE),
        title,
        TITLE_SCALE,
        RED,
    );
    frame.text(
        center_x - text_width_px(hint, HUD_SCALE) / 2,
        center_y + HUD_MARGIN,
        hint,
        HUD_SCALE,
        WHITE,
    );
}
