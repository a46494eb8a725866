//! Keeps a drawing surface's backing store the same size as its displayed
//! box.

/// Anything with a backing resolution that can drift from the size it is
/// displayed at.
pub trait Surface {
    /// Current backing-store resolution.
    fn backing_size(&self) -> (u32, u32);
    /// Resolution the surface is displayed at.
    fn display_size(&self) -> (u32, u32);
    fn set_backing_size(&mut self, width: u32, height: u32);
}

/// Resizes the backing store when it differs from the displayed size.
/// Returns whether a resize happened.
pub fn resize_to_display<S: Surface + ?Sized>(surface: &mut S) -> bool {
    let display = surface.display_size();
    if surface.backing_size() == display {
        return false;
    }
    log::debug!(
        "resizing surface {:?} -> {:?}",
        surface.backing_size(),
        display
    );
    surface.set_backing_size(display.0, display.1);
    true
}
