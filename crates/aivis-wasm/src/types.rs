//! WASM-compatible wrapper types for pipeline results.

use aivis_core::ProcessingResult;
use wasm_bindgen::prelude::*;

/// A processed photo plus the counters describing what was changed.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `data()` copies them into a
/// `Uint8Array`; call it once and keep the result.
#[wasm_bindgen]
pub struct JsProcessedImage {
    result: ProcessingResult,
}

#[wasm_bindgen]
impl JsProcessedImage {
    /// Encoded image bytes (JPEG unless configured otherwise).
    pub fn data(&self) -> Vec<u8> {
        self.result.output_image.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn content_type(&self) -> String {
        self.result.format.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.result.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.result.height
    }

    #[wasm_bindgen(getter)]
    pub fn faces_detected(&self) -> usize {
        self.result.faces_detected
    }

    #[wasm_bindgen(getter)]
    pub fn zones_modified(&self) -> usize {
        self.result.zones_modified
    }

    /// Canonical mode identifier, e.g. `genai_safe`.
    #[wasm_bindgen(getter)]
    pub fn mode_applied(&self) -> String {
        self.result.mode_applied.clone()
    }

    /// Display name of the mode, e.g. `GenAI Safe`.
    #[wasm_bindgen(getter)]
    pub fn mode_label(&self) -> String {
        self.result.mode_label.to_string()
    }

    /// All metadata as a plain object (everything except the bytes).
    pub fn metadata(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.result.metadata())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// File name for a download of the processed upload, e.g.
    /// `processed_holiday.jpg` for `holiday.png`.
    pub fn download_name(&self, original: &str) -> String {
        let stem = original.rsplit_once('.').map_or(original, |(stem, _)| stem);
        let stem = if stem.is_empty() { "image" } else { stem };
        format!("processed_{}.{}", stem, self.result.format.extension())
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsProcessedImage {
    pub(crate) fn from_result(result: ProcessingResult) -> Self {
        Self { result }
    }
}
