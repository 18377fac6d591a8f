// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use canvas_arcade::{DriveInput, RunnerSim};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn add(doc: &Document, tag: &str, id: &str) -> HtmlElement {
    let el: HtmlElement = doc.create_element(tag).unwrap().dyn_into().unwrap();
    el.set_id(id);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn runner_steps_in_the_browser() {
    let mut sim = RunnerSim::default();
    for _ in 0..60 {
        sim.step(&DriveInput::NONE);
    }
    assert!(!sim.is_game_over());
}

#[wasm_bindgen_test]
fn runner_page_starts_once_and_restarts() {
    let doc = document();
    let canvas: HtmlCanvasElement = add(&doc, "canvas", "runner-canvas").dyn_into().unwrap();
    canvas.set_width(800);
    canvas.set_height(400);
    let distance = add(&doc, "span", "runner-distance");
    let panel = add(&doc, "div", "runner-game-over");
    let restart = add(&doc, "button", "runner-restart");

    assert!(canvas_arcade::runner::shell::start_runner().is_ok());
    // Starting again leaves the running game alone.
    assert!(canvas_arcade::runner::shell::start_runner().is_ok());
    assert_eq!(distance.text_content().as_deref(), Some("0m"));
    assert_eq!(panel.style().get_property_value("display").unwrap(), "none");

    restart.click();
    assert_eq!(distance.text_content().as_deref(), Some("0m"));
    assert_eq!(panel.style().get_property_value("display").unwrap(), "none");
}

#[wasm_bindgen_test]
fn catch_page_starts_once() {
    let doc = document();
    let canvas: HtmlCanvasElement = add(&doc, "canvas", "gameCanvas").dyn_into().unwrap();
    canvas.set_width(800);
    canvas.set_height(600);
    add(&doc, "span", "score");
    let panel = add(&doc, "div", "game-over");
    add(&doc, "button", "restart");

    assert!(canvas_arcade::catch::shell::start_catch_game().is_ok());
    assert!(canvas_arcade::catch::shell::start_catch_game().is_ok());
    assert_eq!(panel.style().get_property_value("display").unwrap(), "none");
}

#[wasm_bindgen_test]
fn missing_page_elements_are_reported() {
    // No element with this id exists, so the lookup fails with a named error.
    let err = canvas_arcade::GameError::MissingElement("runner-canvas".into());
    assert_eq!(err.to_string(), "missing element #runner-canvas");
}
