//! AI Visibility Control WASM - WebAssembly bindings for aivis-core
//!
//! Exposes the face-zone perturbation pipeline to JavaScript so that a
//! browser app or a JS HTTP server can protect uploads without a separate
//! image service.
//!
//! # Module Structure
//!
//! - `shield` - The `FaceShield` handle (model loading, process, analyze)
//! - `request` - Upload limits and error-to-status mapping
//! - `types` - WASM-compatible wrapper for processed images
//! - `error` - JS `Error` construction
//!
//! # Usage
//!
//! ```typescript
//! import init, { FaceShield } from '@aivis/wasm';
//!
//! await init();
//!
//! const model = new Uint8Array(await (await fetch('/seeta_fd_frontal_v1.0.bin')).arrayBuffer());
//! const shield = new FaceShield(model, undefined);
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! try {
//!   const out = shield.process(bytes, 'max_privacy', file.type);
//!   console.log(`${out.faces_detected} faces, ${out.zones_modified} zones`);
//!   const blob = new Blob([out.data()], { type: out.content_type });
//! } catch (err) {
//!   console.error(err.status, err.kind, err.message);
//! }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

mod error;
mod request;
mod shield;
mod types;

pub use request::{ALLOWED_CONTENT_TYPES, DEFAULT_MODE, MAX_UPLOAD_BYTES};
pub use shield::FaceShield;
pub use types::JsProcessedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "debug")]
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    aivis_core::VERSION.to_string()
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
}

fn health_status() -> Health {
    Health {
        status: "healthy",
        service: aivis_core::SERVICE_NAME,
    }
}

/// Health check: `{ status: "healthy", service: "ai-visibility-control" }`.
#[wasm_bindgen]
pub fn health() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&health_status()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The built-in modes with their default settings.
#[wasm_bindgen]
pub fn list_modes() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&aivis_core::ModeRegistry::default().modes())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
