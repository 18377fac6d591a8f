//! Browser side of the runner: canvas drawing, Q/W/O/P keys, HUD and restart.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

use super::{DriveInput, Point, RunnerParams, RunnerSim, StepOutcome};
use crate::dom;
use crate::error::GameResult;

const CANVAS_ID: &str = "runner-canvas";
const DISTANCE_ID: &str = "runner-distance";
const GAME_OVER_ID: &str = "runner-game-over";
const RESTART_ID: &str = "runner-restart";

const TORSO_LENGTH: f64 = 50.0;
const HEAD_RADIUS: f64 = 12.0;

struct RunnerShell {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    distance_el: Element,
    game_over_el: HtmlElement,
    sim: RunnerSim,
    input: DriveInput,
    looping: bool,
}

thread_local! {
    static RUNNER: RefCell<Option<RunnerShell>> = const { RefCell::new(None) };
}

/// Map a key to its muscle. Returns `false` for keys the runner ignores.
pub fn apply_key(input: &mut DriveInput, key: &str, held: bool) -> bool {
    let slot = match key {
        "q" | "Q" => &mut input.left_thigh,
        "w" | "W" => &mut input.right_thigh,
        "o" | "O" => &mut input.left_calf,
        "p" | "P" => &mut input.right_calf,
        _ => return false,
    };
    *slot = held;
    true
}

#[wasm_bindgen]
pub fn start_runner() -> Result<(), JsValue> {
    start_with(RunnerParams::default())?;
    Ok(())
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_runner_with_config(json: &str) -> Result<(), JsValue> {
    start_with(RunnerParams::from_json(json)?)?;
    Ok(())
}

fn start_with(params: RunnerParams) -> GameResult<()> {
    // A second start would add listeners and a second frame loop on the same state.
    if RUNNER.with(|cell| cell.borrow().is_some()) {
        log::warn!("runner already started");
        return Ok(());
    }
    let doc = dom::document()?;
    let canvas: HtmlCanvasElement = dom::element(&doc, CANVAS_ID)?;
    let ctx = dom::context_2d(&canvas, CANVAS_ID)?;
    let distance_el: Element = dom::element(&doc, DISTANCE_ID)?;
    let game_over_el: HtmlElement = dom::element(&doc, GAME_OVER_ID)?;
    let restart: HtmlElement = dom::element(&doc, RESTART_ID)?;

    dom::set_visible(&game_over_el, false);
    distance_el.set_text_content(Some("0m"));

    RUNNER.with(|cell| {
        cell.replace(Some(RunnerShell {
            canvas,
            ctx,
            distance_el,
            game_over_el,
            sim: RunnerSim::new(params),
            input: DriveInput::NONE,
            looping: false,
        }))
    });

    for (event, held) in [("keydown", true), ("keyup", false)] {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            RUNNER.with(|cell| {
                if let Some(shell) = cell.borrow_mut().as_mut() {
                    if apply_key(&mut shell.input, &evt.key(), held) {
                        evt.prevent_default();
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| restart_run()) as Box<dyn FnMut(_)>);
        restart.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("runner started");
    ensure_loop();
    Ok(())
}

fn restart_run() {
    RUNNER.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            shell.sim.reset();
            shell.input = DriveInput::NONE;
            shell.distance_el.set_text_content(Some("0m"));
            dom::set_visible(&shell.game_over_el, false);
        }
    });
    ensure_loop();
}

fn ensure_loop() {
    let start = RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(shell) if !shell.looping => {
            shell.looping = true;
            true
        }
        _ => false,
    });
    if start {
        dom::run_frames(|_ts| frame());
    }
}

// One animation frame; `false` stops the loop.
fn frame() -> bool {
    RUNNER.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(shell) = guard.as_mut() else { return false };
        let outcome = shell.sim.step(&shell.input);
        render(shell);
        shell.distance_el.set_text_content(Some(&format!("{}m", shell.sim.distance())));
        match outcome {
            StepOutcome::Running => true,
            StepOutcome::Fallen(_) => {
                dom::set_visible(&shell.game_over_el, true);
                shell.looping = false;
                false
            }
        }
    })
}

fn render(shell: &RunnerShell) {
    let ctx = &shell.ctx;
    let w = shell.canvas.width() as f64;
    let h = shell.canvas.height() as f64;
    let params = shell.sim.params();
    let pose = shell.sim.pose();

    // Keep the runner near the left third of the view.
    let cam = (pose.hip.x - w / 3.0).max(0.0);
    let at = |p: Point| (p.x - cam, p.y);

    ctx.set_fill_style_str("#cfe8ff");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str("#6b8e23");
    ctx.fill_rect(0.0, params.ground_y, w, h - params.ground_y);

    // Meter marks every 100px so movement is visible.
    ctx.set_stroke_style_str("#4a6318");
    ctx.set_line_width(2.0);
    let first = (cam / 100.0).floor() as i64;
    for i in first..=first + (w / 100.0) as i64 + 1 {
        let x = i as f64 * 100.0 - cam;
        dom::line(ctx, x, params.ground_y, x, params.ground_y + 10.0);
    }

    let (hx, hy) = at(pose.hip);
    let neck = pose.hip.reach(pose.rotation + std::f64::consts::PI, TORSO_LENGTH);
    let (nx, ny) = at(neck);
    let head = pose.hip.reach(pose.rotation + std::f64::consts::PI, TORSO_LENGTH + HEAD_RADIUS);

    ctx.set_line_width(6.0);
    ctx.set_line_cap("round");
    for (leg, colour) in [(&pose.right, "#555"), (&pose.left, "#222")] {
        ctx.set_stroke_style_str(colour);
        let (kx, ky) = at(leg.knee);
        let (fx, fy) = at(leg.foot);
        dom::line(ctx, hx, hy, kx, ky);
        dom::line(ctx, kx, ky, fx, fy);
    }
    ctx.set_stroke_style_str("#222");
    dom::line(ctx, hx, hy, nx, ny);

    let (cx, cy) = at(head);
    ctx.begin_path();
    if ctx.arc(cx, cy, HEAD_RADIUS, 0.0, std::f64::consts::TAU).is_ok() {
        ctx.set_fill_style_str("#f1c27d");
        ctx.fill();
        ctx.stroke();
    }
}
