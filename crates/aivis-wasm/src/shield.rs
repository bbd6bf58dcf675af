//! The `FaceShield` handle exposed to JavaScript.

use aivis_core::{
    AnalysisReport, BoundingBox, FixedDetector, Pipeline, PipelineConfig, ProcessingResult,
    RustfaceDetector,
};
use serde::Serialize;
use tracing::{error, info};
use wasm_bindgen::prelude::*;

use crate::error::{make_error, to_js_error};
use crate::request::{validate_upload, ErrorResponse, DEFAULT_MODE};
use crate::types::JsProcessedImage;

/// A loaded face detector plus its pipeline configuration.
///
/// Construct once (model loading is the slow part) and reuse for every
/// upload.
#[wasm_bindgen]
pub struct FaceShield {
    pipeline: Pipeline,
}

#[wasm_bindgen]
impl FaceShield {
    /// Load a SeetaFace detection model and build the pipeline.
    ///
    /// `config` is an optional plain object matching `PipelineConfig`;
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(model: &[u8], config: JsValue) -> Result<FaceShield, JsValue> {
        let config = parse_config(config)?;
        let detector = RustfaceDetector::from_bytes(model).map_err(|e| to_js_error(&e))?;
        let pipeline = Pipeline::with_config(detector, config).map_err(|e| to_js_error(&e))?;
        info!(bytes = model.len(), "face shield ready");
        Ok(FaceShield { pipeline })
    }

    /// Build a shield that "detects" the given boxes in every image.
    ///
    /// `faces` is an array of `{ x, y, width, height }` objects. Intended
    /// for demos and tests that should not depend on a model file.
    pub fn with_faces(faces: JsValue, config: JsValue) -> Result<FaceShield, JsValue> {
        let faces: Vec<BoundingBox> = serde_wasm_bindgen::from_value(faces)
            .map_err(|e| make_error(&ErrorResponse::unparseable("faces", e)))?;
        let config = parse_config(config)?;
        let pipeline = Pipeline::with_config(FixedDetector::new(faces), config)
            .map_err(|e| to_js_error(&e))?;
        Ok(FaceShield { pipeline })
    }

    /// Perturb the faces in an uploaded image.
    ///
    /// `mode` defaults to `genai_safe`. When `content_type` is given it must
    /// be one of the accepted image MIME types.
    pub fn process(
        &self,
        bytes: &[u8],
        mode: Option<String>,
        content_type: Option<String>,
    ) -> Result<JsProcessedImage, JsValue> {
        process_upload(&self.pipeline, bytes, mode.as_deref(), content_type.as_deref())
            .map(JsProcessedImage::from_result)
            .map_err(|e| make_error(&e))
    }

    /// Count faces without modifying anything.
    ///
    /// Resolves to `{ faces_detected, processable, image_size: { width, height } }`.
    pub fn analyze(&self, bytes: &[u8], content_type: Option<String>) -> Result<JsValue, JsValue> {
        let report = analyze_upload(&self.pipeline, bytes, content_type.as_deref())
            .map_err(|e| make_error(&e))?;
        serde_wasm_bindgen::to_value(&AnalysisResponse::from(report))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The configured modes as `[{ id, blur_radius, noise_strength, asymmetry_shift }]`.
    pub fn modes(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.pipeline.modes().modes())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn parse_config(config: JsValue) -> Result<PipelineConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(PipelineConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| make_error(&ErrorResponse::unparseable("config", e)))
}

/// Validate and process one upload, mapping failures to responses.
pub(crate) fn process_upload(
    pipeline: &Pipeline,
    bytes: &[u8],
    mode: Option<&str>,
    content_type: Option<&str>,
) -> Result<ProcessingResult, ErrorResponse> {
    validate_upload(bytes.len(), content_type).map_err(|e| ErrorResponse::from(&e))?;
    let mode = mode.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MODE);

    pipeline.process(bytes, mode).map_err(|e| {
        if !e.is_client_error() {
            error!(error = %e, mode, "processing failed");
        }
        ErrorResponse::from(&e)
    })
}

/// Validate and analyze one upload.
///
/// Every analysis failure other than a bad request is reported as
/// "Analysis failed".
pub(crate) fn analyze_upload(
    pipeline: &Pipeline,
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<AnalysisReport, ErrorResponse> {
    validate_upload(bytes.len(), content_type).map_err(|e| ErrorResponse::from(&e))?;

    pipeline.analyze(bytes).map_err(|e| {
        let mut response = ErrorResponse::from(&e);
        if !e.is_client_error() {
            error!(error = %e, "analysis failed");
            response.message = "Analysis failed".to_string();
        }
        response
    })
}

#[derive(Debug, Serialize)]
struct ImageSize {
    width: u32,
    height: u32,
}

/// Analysis result in the shape HTTP clients already expect.
#[derive(Debug, Serialize)]
struct AnalysisResponse {
    faces_detected: usize,
    processable: bool,
    image_size: ImageSize,
}

impl From<AnalysisReport> for AnalysisResponse {
    fn from(report: AnalysisReport) -> Self {
        AnalysisResponse {
            faces_detected: report.faces_detected,
            processable: report.processable,
            image_size: ImageSize {
                width: report.width,
                height: report.height,
            },
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_invalid_model_is_rejected() {
        assert!(FaceShield::new(&[], JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_unparseable_config_is_error_object() {
        let err = FaceShield::with_faces(js_sys::Array::new().into(), JsValue::from(42))
            .err()
            .unwrap();
        assert!(err.is_instance_of::<js_sys::Error>());
        let status = js_sys::Reflect::get(&err, &"status".into()).unwrap();
        assert_eq!(status.as_f64(), Some(400.0));
        let kind = js_sys::Reflect::get(&err, &"kind".into()).unwrap();
        assert_eq!(kind.as_string().as_deref(), Some("invalid_config"));
    }

    #[wasm_bindgen_test]
    fn test_modes_listing() {
        let shield = FaceShield::with_faces(JsValue::from(js_sys::Array::new()), JsValue::NULL)
            .unwrap();
        let modes = js_sys::Array::from(&shield.modes().unwrap());
        assert_eq!(modes.length(), 3);
    }
}
