//! Error type shared by the loader, the GPU resource constructors and the
//! startup sequence.

use std::fmt;

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Programmable pipeline stage a shader was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RippleError {
    /// The canvas refused to hand out a WebGL2 context.
    #[error("failed to get a WebGL2 context; this browser may not support WebGL2")]
    ContextUnavailable,

    #[error("required DOM object missing: {0}")]
    MissingElement(String),

    /// Asset request answered with a non-success HTTP status.
    #[error("GET {url} failed with status {status} {status_text}")]
    Fetch {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("failed to decode image {url}: {reason}")]
    ImageDecode { url: String, reason: String },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {program_log}")]
    ShaderLink {
        program_log: String,
        vertex_log: String,
        fragment_log: String,
    },

    #[error("shader program has no active attribute `{0}`")]
    MissingAttribute(&'static str),

    #[error("shader program has no active uniform `{0}`")]
    MissingUniform(&'static str),

    /// `create*` returned null, usually because the context was lost.
    #[error("failed to create {0}")]
    ResourceCreation(&'static str),

    #[error("framebuffer incomplete (status 0x{0:04x})")]
    IncompleteFramebuffer(u32),

    /// Anything thrown from the JS side that has no better classification.
    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, RippleError>;

impl From<JsValue> for RippleError {
    fn from(value: JsValue) -> Self {
        RippleError::Js(describe_js(&value))
    }
}

impl From<RippleError> for JsValue {
    fn from(err: RippleError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
