// Interactive heatmap demo. What you SEE:
// * Hold Left Mouse: heat accumulates under the cursor and renders as a
//   blue-to-red density blob, live.
// * G toggles grid mode: samples bin into a fixed 40x25 grid, one
//   auto-sized footprint per hot cell.
// * C clears the painted samples. S saves a PNG snapshot. ESC quits.

mod draw;
mod error;

use draw::{Drawer, Screen, draw_crosshair, draw_text_5x7};
use error::Error;
use heatbrush::{Canvas, Heatmap, Samples};
use std::time::{Duration, Instant};

const WIDTH: usize = 800;
const HEIGHT: usize = 500;
const GRID_W: usize = 40;
const GRID_H: usize = 25;

/// Heat added per held-mouse frame; with max 1.0 a spot reaches full
/// intensity after a short hover.
const BRUSH_WEIGHT: f32 = 0.08;

/// Dark slate backdrop behind the (partially transparent) heatmap.
const BACKDROP: u32 = 0x00_10_10_18;

fn main() -> Result<(), Error> {
    /* --- Window + heatmap setup ---
       Visual: window opens black; nothing shows until you paint. */
    let mut drawer = Drawer::new("Heatbrush - hold LMB to paint heat", WIDTH, HEIGHT)?;
    let mut heat = Heatmap::new(WIDTH, HEIGHT);
    heat.set_point_style(20.0, 12.0); // soft brush for point mode

    /* --- Reusable buffers ---
       `canvas` is the RGBA surface the pipeline renders into;
       `screen` is the 0x00RRGGBB buffer the window presents. */
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let mut screen = Screen::new(WIDTH, HEIGHT);

    let mut grid_mode = false;

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Inputs */
        if drawer.g_pressed_once() {
            grid_mode = !grid_mode;
            if grid_mode {
                // Fresh grid; no point style so the radius auto-derives
                // from the cell size (cells never visually overlap).
                heat.data_matrix(GRID_W, GRID_H);
                heat.reset_point_style();
            } else {
                heat.data(Vec::new());
                heat.set_point_style(20.0, 12.0);
            }
        }
        if drawer.c_pressed_once() {
            // Visual: all heat disappears.
            if grid_mode {
                heat.data_matrix(GRID_W, GRID_H);
            } else {
                heat.clear();
            }
        }

        // Paint while holding left mouse: heat grows under the cursor.
        if drawer.left_mouse_down() {
            if let Some((mx, my)) = drawer.mouse_pos() {
                heat.add(mx as f32, my as f32, BRUSH_WEIGHT);
            }
        }

        /* 2) Render the heatmap into the RGBA canvas. */
        heat.draw(&mut canvas);

        if drawer.s_pressed_once() {
            save_snapshot(&canvas)?;
        }

        /* 3) Composite the canvas over the backdrop into the window buffer. */
        blit_over_backdrop(&canvas, &mut screen);

        /* 4) Crosshair + HUD text on top. */
        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx as i32, my as i32, 10, 0x00_FF_CC_33);
        }

        let hud = match heat.samples() {
            Samples::Points(points) => {
                format!("POINT | N: {} | {}", points.len(), hud_fps_text)
            }
            Samples::Grid(_) => format!("GRID {}:{} | {}", GRID_W, GRID_H, hud_fps_text),
        };
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);
        draw_text_5x7(&mut screen, 8, 18, "C: CLEAR  G: GRID  S: SNAP", 0x00_9A_9A_9A);

        /* 5) Present to the window. */
        drawer.present(&screen)?;

        /* 6) FPS counter (terminal + HUD once per second). */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            println!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

/// Source-over the RGBA canvas onto the opaque backdrop, packing each pixel
/// as 0x00RRGGBB for minifb.
fn blit_over_backdrop(canvas: &Canvas, screen: &mut Screen) {
    let br = ((BACKDROP >> 16) & 0xFF) as f32;
    let bg = ((BACKDROP >> 8) & 0xFF) as f32;
    let bb = (BACKDROP & 0xFF) as f32;

    for (dst, px) in screen.pixels.iter_mut().zip(canvas.pixels().chunks_exact(4)) {
        let a = px[3] as f32 / 255.0;
        if a <= 0.0 {
            *dst = BACKDROP;
            continue;
        }
        let inv = 1.0 - a;
        let r = (px[0] as f32 * a + br * inv) as u32;
        let g = (px[1] as f32 * a + bg * inv) as u32;
        let b = (px[2] as f32 * a + bb * inv) as u32;
        *dst = (r << 16) | (g << 8) | b;
    }
}

/// Write the current RGBA canvas to heatbrush.png next to the binary.
fn save_snapshot(canvas: &Canvas) -> Result<(), Error> {
    image::save_buffer(
        "heatbrush.png",
        canvas.pixels(),
        canvas.width() as u32,
        canvas.height() as u32,
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| Error::Snapshot(e.to_string()))?;
    println!("Saved heatbrush.png");
    Ok(())
}
