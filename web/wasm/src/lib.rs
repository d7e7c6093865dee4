use geojson_wfst::{ActionsInput, FeatureInput, Params, WfstError};
use wasm_bindgen::prelude::*;

fn to_js(err: WfstError) -> JsValue {
    JsValue::from_str(&format!("{err}"))
}

/// `params` may be an empty string, meaning no overrides.
fn parse_params(params: &str) -> Result<Params, JsValue> {
    if params.trim().is_empty() {
        return Ok(Params::default());
    }
    Params::from_json(params).map_err(to_js)
}

fn run_action(
    features: &str,
    params: &str,
    action: fn(FeatureInput, &Params) -> geojson_wfst::Result<String>,
) -> Result<String, JsValue> {
    let params = parse_params(params)?;
    let features = FeatureInput::from_json_str(features).map_err(to_js)?;
    action(features, &params).map_err(to_js)
}

/// `wfs:Insert` for a GeoJSON Feature, FeatureCollection, or array of Features.
#[wasm_bindgen(js_name = "Insert")]
pub fn insert(features: &str, params: &str) -> Result<String, JsValue> {
    run_action(features, params, geojson_wfst::insert)
}

#[wasm_bindgen(js_name = "Update")]
pub fn update(features: &str, params: &str) -> Result<String, JsValue> {
    run_action(features, params, geojson_wfst::update)
}

#[wasm_bindgen(js_name = "Delete")]
pub fn delete(features: &str, params: &str) -> Result<String, JsValue> {
    run_action(features, params, geojson_wfst::delete)
}

#[wasm_bindgen(js_name = "Replace")]
pub fn replace(features: &str, params: &str) -> Result<String, JsValue> {
    run_action(features, params, geojson_wfst::replace)
}

/// Wrap actions in a `wfs:Transaction`.
///
/// `actions` is a JSON string, an array of JSON strings, or an object with
/// `insert`, `update` and/or `delete` features.
#[wasm_bindgen(js_name = "Transaction")]
pub fn transaction(actions: &str, params: &str) -> Result<String, JsValue> {
    let params = parse_params(params)?;
    let actions = ActionsInput::from_json_str(actions).map_err(to_js)?;
    geojson_wfst::transaction(actions, &params).map_err(to_js)
}
