use macroquad::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use storepilot_geo::GridPoint;

use crate::blackboard::{snapshot, Blackboard, Mode};
use crate::engine::NavigationEngine;
use crate::store::StoreSection;

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "Storepilot — In-Store Navigation".to_string(),
        window_width: 960,
        window_height: 720,
        high_dpi: true,
        ..Default::default()
    }
}

const MARGIN: f32 = 40.0;

/// Demo items cycled through with the `A` key.
const DEMO_ITEMS: &[&str] = &["Milk", "Bread", "Apples", "Coffee", "Chicken", "Detergent"];

fn section_color(rgb: u32) -> Color {
    Color::from_rgba(
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
        255,
    )
}

struct MapTransform {
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl MapTransform {
    fn fit(grid_width: f32, grid_height: f32) -> Self {
        let usable_w = screen_width() - 2.0 * MARGIN - 220.0; // leave room for the panel text
        let usable_h = screen_height() - 2.0 * MARGIN;
        let scale = (usable_w / grid_width).min(usable_h / grid_height);
        MapTransform {
            origin_x: MARGIN,
            origin_y: MARGIN,
            scale,
        }
    }

    fn to_screen(&self, p: GridPoint) -> (f32, f32) {
        (
            self.origin_x + p.x as f32 * self.scale,
            self.origin_y + p.y as f32 * self.scale,
        )
    }
}

fn draw_sections(sections: &[StoreSection], route: &[String], t: &MapTransform) {
    for s in sections {
        // Grid areas are 1-based CSS-style grid lines over the 20x20 layout.
        let x = t.origin_x + (s.area.col_start - 1) as f32 * t.scale;
        let y = t.origin_y + (s.area.row_start - 1) as f32 * t.scale;
        let w = (s.area.col_end - s.area.col_start) as f32 * t.scale;
        let h = (s.area.row_end - s.area.row_start) as f32 * t.scale;

        draw_rectangle(x, y, w, h, section_color(s.color));
        if route.iter().any(|id| id == s.id) {
            draw_rectangle_lines(x, y, w, h, 3.0, ORANGE);
        } else {
            draw_rectangle_lines(x, y, w, h, 1.0, GRAY);
        }
        draw_text(s.name, x + 4.0, y + 14.0, 14.0, DARKGRAY);
    }
}

fn draw_route(path: &[GridPoint], t: &MapTransform) {
    for pair in path.windows(2) {
        let (x0, y0) = t.to_screen(pair[0]);
        let (x1, y1) = t.to_screen(pair[1]);
        draw_line(x0, y0, x1, y1, 2.0, BLUE);
    }
}

/// Render loop: one animation tick, one position-topic drain, one draw per
/// frame. Key bindings drive the engine in place of the original's panel UI.
pub async fn run(
    engine: Arc<Mutex<NavigationEngine>>,
    bb: Blackboard,
    mut position_rx: broadcast::Receiver<GridPoint>,
) {
    let sections = engine.lock().sections().to_vec();
    let (grid_w, grid_h) = (20.0f32, 20.0f32);
    let mut marker = snapshot(&bb).position;
    let mut demo_index = 0usize;

    info!("floor map loop starting");

    loop {
        handle_keys(&engine, &mut demo_index);

        // Advance the simulated walk one display frame.
        engine.lock().tick_frame();

        match position_rx.try_recv() {
            Ok(p) => marker = p,
            Err(broadcast::error::TryRecvError::Empty) => {}
            Err(broadcast::error::TryRecvError::Lagged(_)) => {
                warn!("position receiver lagged");
                // Drain the backlog and keep the freshest point.
                loop {
                    match position_rx.try_recv() {
                        Ok(p) => marker = p,
                        Err(_) => break,
                    }
                }
            }
            Err(broadcast::error::TryRecvError::Closed) => break,
        }

        let state = snapshot(&bb);

        clear_background(WHITE);
        let t = MapTransform::fit(grid_w, grid_h);

        draw_sections(&sections, &state.route, &t);
        draw_route(&state.cursor.path, &t);

        let (mx, my) = t.to_screen(marker);
        draw_circle(mx, my, 8.0, DARKBLUE);
        draw_circle_lines(mx, my, 11.0, 2.0, BLUE);

        draw_panel(&engine, &state, &t);

        next_frame().await
    }
}

fn handle_keys(engine: &Arc<Mutex<NavigationEngine>>, demo_index: &mut usize) {
    if is_key_pressed(KeyCode::A) {
        let name = DEMO_ITEMS[*demo_index % DEMO_ITEMS.len()];
        *demo_index += 1;
        if let Err(e) = engine.lock().add_item(name) {
            warn!(error = %e, "add item failed");
        }
    }
    if is_key_pressed(KeyCode::N) {
        if let Err(e) = engine.lock().start_navigation() {
            warn!(error = %e, "start navigation failed");
        }
    }
    if is_key_pressed(KeyCode::S) {
        engine.lock().stop_navigation();
    }
    if is_key_pressed(KeyCode::T) {
        if let Err(e) = engine.lock().toggle_live_tracking() {
            warn!(error = %e, "toggle live tracking failed");
        }
    }
    if is_key_pressed(KeyCode::K) {
        if let Err(e) = engine.lock().save_list() {
            warn!(error = %e, "save list failed");
        }
    }
    if is_key_pressed(KeyCode::L) {
        if let Err(e) = engine.lock().load_list() {
            warn!(error = %e, "load list failed");
        }
    }
}

fn draw_panel(
    engine: &Arc<Mutex<NavigationEngine>>,
    state: &crate::blackboard::SharedState,
    t: &MapTransform,
) {
    let x = t.origin_x + 20.0 * t.scale + 20.0;
    let mut y = MARGIN;
    let mut line = |text: &str, color: Color| {
        draw_text(text, x, y, 18.0, color);
        y += 22.0;
    };

    let mode = match state.mode {
        Mode::Idle => "idle",
        Mode::Animating => "navigating",
        Mode::LiveTracking => "live tracking",
    };
    line(&format!("mode: {}", mode), BLACK);
    line(
        &format!("position: {:.1}, {:.1}", state.position.x, state.position.y),
        BLACK,
    );

    let g = engine.lock();
    let billing = g.billing();
    line(&format!("items: {}", g.shopping_list().len()), BLACK);
    for item in g.shopping_list() {
        line(&format!("  {} (${:.2})", item.name, item.price), DARKGRAY);
    }
    line(
        &format!(
            "subtotal ${:.2}  tax ${:.2}  total ${:.2}",
            billing.subtotal, billing.tax, billing.total
        ),
        BLACK,
    );
    drop(g);

    if let Some(err) = &state.error {
        line(err, RED);
    }

    line("", BLACK);
    line("[A] add item  [N] navigate  [S] stop", GRAY);
    line("[T] live tracking  [K] save  [L] load", GRAY);
}
