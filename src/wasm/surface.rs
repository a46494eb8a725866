use web_sys::HtmlCanvasElement;

use crate::viewport::Surface;

impl Surface for HtmlCanvasElement {
    fn backing_size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn display_size(&self) -> (u32, u32) {
        (
            self.client_width().max(0) as u32,
            self.client_height().max(0) as u32,
        )
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.set_width(width);
        self.set_height(height);
    }
}
