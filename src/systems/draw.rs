use std::sync::Arc;

use crate::math::Rect;

/// One draw-image-region call: a sprite-sheet source rect blitted to a world rect
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub sheet: Arc<str>,
    pub source: Rect,
    pub destination: Rect,
    pub rotation: f32,
    pub alpha: f32,
    pub layer_depth: f32,
}

/// Anything artists can blit into
pub trait RenderTarget {
    fn draw_image(&mut self, call: DrawCall);
}

/// Records draw calls in submission order for a renderer (or a test) to consume
#[derive(Default, Debug)]
pub struct DrawList {
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for DrawList {
    fn draw_image(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}
