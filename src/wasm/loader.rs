//! Asynchronous asset loading: shader text over `fetch`, images through an
//! `<img>` element.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, Response, WebGl2RenderingContext as GL};

use super::texture::{texture_from_image, Texture};
use crate::error::{describe_js, Result, RippleError};

/// GETs `url` and returns the body as text. Any non-2xx status is an error;
/// nothing is retried.
pub async fn request_file(url: &str) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| RippleError::MissingElement("window".into()))?;

    // A rejected fetch means the request never produced a response at all.
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| RippleError::Fetch {
            url: url.to_string(),
            status: 0,
            status_text: describe_js(&e),
        })?;
    let response: Response = response.dyn_into()?;

    if !response.ok() {
        return Err(RippleError::Fetch {
            url: url.to_string(),
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    let text = JsFuture::from(response.text()?).await?;
    let text = text
        .as_string()
        .ok_or_else(|| RippleError::Js(format!("{url}: response body is not text")))?;
    log::debug!("fetched {url} ({} bytes)", text.len());
    Ok(text)
}

/// Fetches and decodes an image, then uploads it as a texture.
pub async fn load_image(gl: &GL, url: &str) -> Result<Texture> {
    let image = HtmlImageElement::new()?;
    image.set_src(url);
    JsFuture::from(image.decode())
        .await
        .map_err(|e| RippleError::ImageDecode {
            url: url.to_string(),
            reason: describe_js(&e),
        })?;
    log::debug!(
        "decoded {url} ({}x{})",
        image.natural_width(),
        image.natural_height()
    );
    texture_from_image(gl, &image)
}
