//! Go board diagrams from a small text notation.
//!
//! Text is parsed into a [`types::ParseResult`], mapped onto a
//! [`board::Board`] and drawn as SVG. The crate is built as a WebAssembly
//! module for the host editor; the functions in this file are the whole
//! surface it sees. Rust callers use [`diagram::render_source`] or the
//! individual stages directly.

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod board;
pub mod coord;
pub mod diagram;
pub mod error;
pub mod parser;
pub mod render;
pub mod settings;
pub mod theme;
pub mod types;

use settings::{DEFAULT_SETTINGS, Settings};
use types::Color;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Renders diagram text. Resolves to `{ svg, width, height, boardSize,
/// blackCount, whiteCount, errors }`; rejects only on invalid settings.
#[wasm_bindgen(js_name = renderDiagram)]
pub fn render_diagram(source: &str, settings: JsValue) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    let state = diagram::render_source(source, &settings).map_err(to_js_error)?;
    to_js(&state)
}

/// Parses diagram text without rendering it.
#[wasm_bindgen(js_name = parseDiagram)]
pub fn parse_diagram(source: &str, settings: JsValue) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    let result = parser::parse(source, &settings.parse_defaults());
    to_js(&result)
}

#[wasm_bindgen(js_name = encodeCoordinate)]
pub fn encode_coordinate(x: usize, y: usize) -> Option<String> {
    coord::encode(x, y)
}

/// Returns `{ x, y }`, or `null` for malformed text.
#[wasm_bindgen(js_name = decodeCoordinate)]
pub fn decode_coordinate(text: &str) -> Result<JsValue, JsValue> {
    to_js(&coord::decode(text))
}

/// Returns the source rewritten so `(x, y)` holds `color` (`"black"`/`"b"`,
/// `"white"`/`"w"`), or is cleared when `color` is null.
#[wasm_bindgen(js_name = placeStone)]
pub fn place_stone(
    source: &str,
    settings: JsValue,
    x: usize,
    y: usize,
    color: Option<String>,
) -> Result<String, JsValue> {
    let settings = settings_from_js(settings)?;
    let color = color.as_deref().map(parse_color).transpose()?;
    diagram::place_stone(source, &settings.parse_defaults(), x, y, color).map_err(to_js_error)
}

fn settings_from_js(value: JsValue) -> Result<Settings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(DEFAULT_SETTINGS.clone());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn parse_color(name: &str) -> Result<Color, JsValue> {
    match name.to_ascii_lowercase().as_str() {
        "b" | "black" => Ok(Color::Black),
        "w" | "white" => Ok(Color::White),
        _ => Err(JsValue::from_str(&format!("unknown stone color: {name}"))),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
