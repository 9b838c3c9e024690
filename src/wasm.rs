//! WASM bindings for the frame solver
//!
//! Runs the solver in the browser (typically inside a Web Worker) with the
//! same JSON envelope as the HTTP server.

use wasm_bindgen::prelude::*;

use crate::api;

// Use wee_alloc for smaller WASM binary
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Analyze a frame model
///
/// Takes a JSON string `{ "model": ..., "options": ... }` and returns a JSON
/// string with either the results or the error and its kind.
#[wasm_bindgen]
pub fn analyze(request_json: &str) -> String {
    let start = js_sys::Date::now();
    let response = api::run_json(request_json);

    let elapsed = js_sys::Date::now() - start;
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "frame-solver: analysis took {:.1} ms",
        elapsed
    )));

    response
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
