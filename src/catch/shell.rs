//! Browser side of the ball game: pointer input, drawing, score and restart.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement, MouseEvent};

use super::{CatchGame, CatchParams, PLAYER_COLOUR, TickOutcome};
use crate::dom;
use crate::error::GameResult;

const CANVAS_ID: &str = "gameCanvas";
const SCORE_ID: &str = "score";
const GAME_OVER_ID: &str = "game-over";
const RESTART_ID: &str = "restart";

struct CatchShell {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    score_el: Element,
    game_over_el: HtmlElement,
    game: CatchGame,
    shown_score: Option<u32>,
    looping: bool,
}

thread_local! {
    static CATCH: RefCell<Option<CatchShell>> = const { RefCell::new(None) };
}

#[wasm_bindgen]
pub fn start_catch_game() -> Result<(), JsValue> {
    start_with(CatchParams::default())?;
    Ok(())
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_catch_game_with_config(json: &str) -> Result<(), JsValue> {
    start_with(CatchParams::from_json(json)?)?;
    Ok(())
}

#[cfg(feature = "rng")]
fn seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            log::warn!("getrandom failed ({err}), seeding from clock");
            dom::now_ms().to_bits()
        }
    }
}

#[cfg(not(feature = "rng"))]
fn seed() -> u64 {
    dom::now_ms().to_bits()
}

fn start_with(mut params: CatchParams) -> GameResult<()> {
    // A second start would add listeners and a second frame loop on the same state.
    if CATCH.with(|cell| cell.borrow().is_some()) {
        log::warn!("catch game already started");
        return Ok(());
    }
    let doc = dom::document()?;
    let canvas: HtmlCanvasElement = dom::element(&doc, CANVAS_ID)?;
    let ctx = dom::context_2d(&canvas, CANVAS_ID)?;
    let score_el: Element = dom::element(&doc, SCORE_ID)?;
    let game_over_el: HtmlElement = dom::element(&doc, GAME_OVER_ID)?;
    let restart: HtmlElement = dom::element(&doc, RESTART_ID)?;

    // The field is whatever size the page gave the canvas.
    params.width = canvas.width() as f64;
    params.height = canvas.height() as f64;

    dom::set_visible(&game_over_el, false);
    CATCH.with(|cell| {
        cell.replace(Some(CatchShell {
            canvas: canvas.clone(),
            ctx,
            score_el,
            game_over_el,
            game: CatchGame::new(params, seed()),
            shown_score: None,
            looping: false,
        }))
    });

    {
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let x = evt.client_x() as f64 - rect.left();
            let y = evt.client_y() as f64 - rect.top();
            with_game(|game| game.set_pointer(x, y));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for (event, down) in [("mousedown", true), ("mouseup", false)] {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            with_game(|game| game.set_pointer_down(down));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| restart_game()) as Box<dyn FnMut(_)>);
        restart.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("catch game started");
    ensure_loop();
    Ok(())
}

fn with_game(f: impl FnOnce(&mut CatchGame)) {
    CATCH.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            f(&mut shell.game);
        }
    });
}

fn restart_game() {
    CATCH.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            shell.game.reset();
            shell.shown_score = None;
            dom::set_visible(&shell.game_over_el, false);
        }
    });
    ensure_loop();
}

fn ensure_loop() {
    let start = CATCH.with(|cell| match cell.borrow_mut().as_mut() {
        Some(shell) if !shell.looping => {
            shell.looping = true;
            true
        }
        _ => false,
    });
    if start {
        dom::run_frames(frame);
    }
}

fn frame(ts: f64) -> bool {
    CATCH.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(shell) = guard.as_mut() else { return false };
        let outcome = shell.game.tick(ts);

        let score = shell.game.score();
        if shell.shown_score != Some(score) {
            shell.score_el.set_text_content(Some(&format!("Score: {score}")));
            shell.shown_score = Some(score);
        }

        match outcome {
            TickOutcome::Running => {
                render(shell);
                true
            }
            TickOutcome::GameOver => {
                dom::set_visible(&shell.game_over_el, true);
                shell.looping = false;
                false
            }
        }
    })
}

fn render(shell: &CatchShell) {
    let ctx = &shell.ctx;
    let game = &shell.game;
    ctx.clear_rect(0.0, 0.0, shell.canvas.width() as f64, shell.canvas.height() as f64);

    let bat = game.bat();
    let left = bat.x - bat.width / 2.0;
    ctx.set_fill_style_str(PLAYER_COLOUR);
    ctx.fill_rect(left, bat.y - bat.height / 2.0, bat.width, bat.height);
    let cooling = game.cooldown_ratio();
    if cooling > 0.0 {
        ctx.set_fill_style_str("#2196F3");
        ctx.fill_rect(left, bat.y + bat.height / 2.0, bat.width * (1.0 - cooling), 5.0);
    }

    for ball in game.balls().iter().filter(|b| !b.clicked) {
        ctx.begin_path();
        if ctx.arc(ball.x, ball.y, ball.radius, 0.0, std::f64::consts::TAU).is_ok() {
            ctx.set_fill_style_str(ball.colour);
            ctx.fill();
        }
        ctx.close_path();
    }
}
