//! Conversion of pipeline errors into JavaScript `Error` objects.

use js_sys::Reflect;
use wasm_bindgen::JsValue;

use crate::request::ErrorResponse;

/// Build a JS `Error` carrying `kind` and `status` properties.
///
/// Callers can branch on `err.kind` and forward `err.status` as an HTTP
/// status without parsing the message.
pub(crate) fn make_error(response: &ErrorResponse) -> JsValue {
    let err = js_sys::Error::new(&response.message);
    let obj: &JsValue = err.as_ref();
    let _ = Reflect::set(obj, &"kind".into(), &response.kind.into());
    let _ = Reflect::set(obj, &"status".into(), &JsValue::from(response.status));
    err.into()
}

pub(crate) fn to_js_error(response: impl Into<ErrorResponse>) -> JsValue {
    make_error(&response.into())
}
