// Small DOM helpers shared by the game shells.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window};

use crate::error::{GameError, GameResult};

pub(crate) fn window() -> GameResult<Window> {
    web_sys::window().ok_or(GameError::NoWindow)
}

pub(crate) fn document() -> GameResult<Document> {
    window()?.document().ok_or(GameError::NoDocument)
}

/// Look up `#id` and cast it. Missing elements are reported on the console.
pub(crate) fn element<T: JsCast>(doc: &Document, id: &str) -> GameResult<T> {
    let Some(el) = doc.get_element_by_id(id) else {
        log::error!("element #{id} not found");
        return Err(GameError::MissingElement(id.to_string()));
    };
    el.dyn_into::<T>().map_err(|_| GameError::WrongElementType(id.to_string()))
}

pub(crate) fn context_2d(canvas: &HtmlCanvasElement, id: &str) -> GameResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| GameError::Js(format!("#{id} has no 2d context")))?
        .dyn_into()
        .map_err(|_| GameError::WrongElementType(id.to_string()))
}

pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub(crate) fn set_visible(el: &HtmlElement, visible: bool) {
    let display = if visible { "block" } else { "none" };
    if el.style().set_property("display", display).is_err() {
        log::warn!("could not set display on #{}", el.id());
    }
}

pub(crate) fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Drive `frame` from `requestAnimationFrame` until it returns `false`.
pub(crate) fn run_frames<F>(mut frame: F)
where
    F: FnMut(f64) -> bool + 'static,
{
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if frame(ts) {
            request_frame(&f);
        } else {
            // Break the closure <-> Rc cycle; wasm-bindgen frees it once this call returns.
            drop(f.borrow_mut().take());
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(f: &FrameCallback) {
    let Some(w) = web_sys::window() else { return };
    if let Some(cb) = f.borrow().as_ref() {
        if w.request_animation_frame(cb.as_ref().unchecked_ref()).is_err() {
            log::error!("requestAnimationFrame failed");
        }
    }
}
