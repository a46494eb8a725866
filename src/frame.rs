//! Per-frame sequencing: resize, bake the stamp into the height field, then
//! composite to the screen.

use std::cell::Cell;
use std::rc::Rc;

use crate::clock::FrameClock;

/// Where the render loop is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameState {
    #[default]
    Uninitialized,
    /// Shaders and the background image are being fetched.
    Loading,
    Ready,
    Resizing,
    Updating,
    Drawing,
}

/// The GPU work one frame is made of.
pub trait FramePasses {
    /// Syncs the backing store with the displayed size; true if it changed.
    fn resize(&mut self) -> bool;
    /// Renders the stamp, translated by `stamp_offset` in clip space, into
    /// the offscreen height map.
    fn update(&mut self, stamp_offset: [f32; 2]);
    /// Composites the height map over the background on the visible surface.
    fn draw(&mut self);
}

/// Shared slot the pointer handler writes stamp positions into.
///
/// Cloning shares the slot. The last position written stays in effect until
/// replaced.
#[derive(Debug, Clone, Default)]
pub struct StampInput(Rc<Cell<Option<[f32; 2]>>>);

impl StampInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, position: [f32; 2]) {
        self.0.set(Some(position));
    }

    pub fn current(&self) -> Option<[f32; 2]> {
        self.0.get()
    }

    pub fn clear(&self) {
        self.0.set(None);
    }
}

/// Shared view of the current [`FrameState`]. Startup moves it through
/// `Loading`, the driver owns it from `Ready` on.
#[derive(Debug, Clone, Default)]
pub struct FrameStatus(Rc<Cell<FrameState>>);

impl FrameStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> FrameState {
        self.0.get()
    }

    pub fn set(&self, state: FrameState) {
        log::trace!("frame state: {:?} -> {:?}", self.0.get(), state);
        self.0.set(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// First callback: the clock was started, nothing was drawn.
    Primed,
    Rendered { elapsed_ms: u64, resized: bool },
}

pub struct FrameDriver<P> {
    passes: P,
    clock: FrameClock,
    status: FrameStatus,
    stamps: StampInput,
}

impl<P: FramePasses> FrameDriver<P> {
    /// Wraps fully loaded passes and moves `status` to `Ready`.
    pub fn new(passes: P, stamps: StampInput, status: FrameStatus) -> Self {
        status.set(FrameState::Ready);
        Self {
            passes,
            clock: FrameClock::new(),
            status,
            stamps,
        }
    }

    pub fn state(&self) -> FrameState {
        self.status.get()
    }

    pub fn passes(&self) -> &P {
        &self.passes
    }

    pub fn passes_mut(&mut self) -> &mut P {
        &mut self.passes
    }

    /// Runs one display-refresh callback.
    pub fn on_animation_frame(&mut self, now_ms: u64) -> FrameOutcome {
        if !self.clock.is_started() {
            self.clock.start(now_ms);
            return FrameOutcome::Primed;
        }

        self.status.set(FrameState::Resizing);
        let resized = self.passes.resize();

        self.status.set(FrameState::Updating);
        let offset = self.stamps.current().unwrap_or([0.0, 0.0]);
        self.passes.update(offset);

        self.status.set(FrameState::Drawing);
        self.passes.draw();

        self.status.set(FrameState::Ready);
        let elapsed_ms = self.clock.tick(now_ms);
        log::trace!("frame rendered in {elapsed_ms} ms (resized: {resized})");
        FrameOutcome::Rendered { elapsed_ms, resized }
    }
}
