//! Sprite artists: static sheet regions and pose-animated takes.
//!
//! An [`AnimationSet`] is frozen catalog data shared between every sprite that
//! uses it. Each [`AnimatedSpriteArtist`] carries only its own playback
//! cursor (current take, frame, loop count, accumulated time).

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::components::Transform2D;
use crate::error::GameError;
use crate::math::{Rect, Vector2};
use crate::systems::{DrawCall, RenderTarget};

/// A named clip of consecutive sheet cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationTake {
    pub fps: f32,
    /// -1 loops forever, 0 plays once, N plays N times in total.
    pub max_loop_count: i32,
    pub start_cell_index: usize,
    pub end_cell_index: usize,
    pub bounding_box_dimensions: Vector2,
    pub cell_data: Vec<Rect>,
}

impl AnimationTake {
    pub fn frame_count(&self) -> usize {
        self.end_cell_index.saturating_sub(self.start_cell_index) + 1
    }

    /// Cell count must match the declared index range.
    pub fn validate(&self) -> Result<(), String> {
        if self.end_cell_index < self.start_cell_index {
            return Err(format!(
                "end cell {} precedes start cell {}",
                self.end_cell_index, self.start_cell_index
            ));
        }
        if self.cell_data.len() != self.frame_count() {
            return Err(format!(
                "{} cells declared for range {}..={}",
                self.cell_data.len(),
                self.start_cell_index,
                self.end_cell_index
            ));
        }
        Ok(())
    }

    fn frame_duration_ms(&self) -> Option<f32> {
        (self.fps > 0.0).then(|| 1000.0 / self.fps)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationSet {
    pub id: String,
    pub sprite_sheet: Arc<str>,
    pub alpha: f32,
    pub takes: FxHashMap<String, AnimationTake>,
}

impl AnimationSet {
    pub fn take(&self, name: &str) -> Result<&AnimationTake, GameError> {
        self.takes.get(name).ok_or_else(|| GameError::UnknownTake {
            set: self.id.clone(),
            take: name.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), GameError> {
        for (name, take) in &self.takes {
            take.validate().map_err(|reason| {
                GameError::InvalidCatalog(format!("{}/{name}: {reason}", self.id))
            })?;
        }
        Ok(())
    }
}

/// Draws one fixed region of a sheet stretched over the transform bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteArtist {
    pub sheet: Arc<str>,
    pub alpha: f32,
    pub source: Rect,
}

impl SpriteArtist {
    pub fn new(sheet: Arc<str>, alpha: f32, source: Rect) -> Self {
        Self {
            sheet,
            alpha,
            source,
        }
    }

    pub fn draw(&self, transform: &Transform2D, target: &mut dyn RenderTarget) {
        target.draw_image(DrawCall {
            sheet: self.sheet.clone(),
            source: self.source,
            destination: transform.bounds(),
            rotation: transform.rotation,
            alpha: self.alpha,
            layer_depth: transform.layer_depth,
        });
    }
}

#[derive(Debug, Clone)]
pub struct AnimatedSpriteArtist {
    set: Arc<AnimationSet>,
    take_name: String,
    current_cell: usize,
    loop_count: u32,
    elapsed_ms: f32,
    finished: bool,
}

impl AnimatedSpriteArtist {
    /// Starts on `take`; fails if the set has no such take.
    pub fn new(set: Arc<AnimationSet>, take: &str) -> Result<Self, GameError> {
        let start = set.take(take)?.start_cell_index;
        Ok(Self {
            set,
            take_name: take.to_string(),
            current_cell: start,
            loop_count: 0,
            elapsed_ms: 0.0,
            finished: false,
        })
    }

    pub fn set_take(&mut self, name: &str) -> Result<(), GameError> {
        let start = self.set.take(name)?.start_cell_index;
        self.take_name = name.to_string();
        self.current_cell = start;
        self.loop_count = 0;
        self.elapsed_ms = 0.0;
        self.finished = false;
        Ok(())
    }

    pub fn take_name(&self) -> &str {
        &self.take_name
    }

    pub fn current_cell_index(&self) -> usize {
        self.current_cell
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// True once a finite take has used up its loops and frozen on its last frame.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn animation_set(&self) -> &AnimationSet {
        &self.set
    }

    pub fn single_frame_dimensions(&self, take: &str) -> Result<Vector2, GameError> {
        Ok(self.set.take(take)?.bounding_box_dimensions)
    }

    fn current_take(&self) -> Option<&AnimationTake> {
        self.set.takes.get(&self.take_name)
    }

    pub fn current_cell(&self) -> Option<Rect> {
        let take = self.current_take()?;
        take.cell_data
            .get(self.current_cell - take.start_cell_index)
            .copied()
    }

    pub fn update(&mut self, elapsed_ms: f32) {
        if self.finished {
            return;
        }
        let Some(take) = self.set.takes.get(&self.take_name) else {
            return;
        };
        let Some(frame_ms) = take.frame_duration_ms() else {
            return;
        };
        let (start, end, max_loops) = (
            take.start_cell_index,
            take.end_cell_index,
            take.max_loop_count,
        );

        self.elapsed_ms += elapsed_ms.max(0.0);
        let frames = (self.elapsed_ms / frame_ms).floor();
        if frames < 1.0 {
            return;
        }
        self.elapsed_ms %= frame_ms;

        let span = (end - start + 1) as u64;
        let position = (self.current_cell - start) as u64 + frames as u64;
        let wraps = position / span;

        if max_loops >= 0 {
            let plays = max_loops.max(1) as u64;
            let wraps_left = plays.saturating_sub(self.loop_count as u64 + 1);
            if wraps > wraps_left {
                self.current_cell = end;
                self.loop_count = (plays - 1) as u32;
                self.finished = true;
                self.elapsed_ms = 0.0;
                return;
            }
        }
        self.current_cell = start + (position % span) as usize;
        self.loop_count = self.loop_count.saturating_add(wraps.min(u32::MAX as u64) as u32);
    }

    /// Blits the current cell at the transform's top-left, sized by cell × scale.
    pub fn draw(&self, transform: &Transform2D, target: &mut dyn RenderTarget) {
        let Some(source) = self.current_cell() else {
            return;
        };
        let bounds = transform.bounds();
        target.draw_image(DrawCall {
            sheet: self.set.sprite_sheet.clone(),
            source,
            destination: Rect::from_position_size(
                bounds.position(),
                source.size().multiply(transform.scale),
            ),
            rotation: transform.rotation,
            alpha: self.set.alpha,
            layer_depth: transform.layer_depth,
        });
    }
}

#[derive(Debug, Clone)]
pub enum Artist {
    Static(SpriteArtist),
    Animated(AnimatedSpriteArtist),
}

impl Artist {
    pub fn update(&mut self, elapsed_ms: f32) {
        if let Artist::Animated(artist) = self {
            artist.update(elapsed_ms);
        }
    }

    pub fn draw(&self, transform: &Transform2D, target: &mut dyn RenderTarget) {
        match self {
            Artist::Static(artist) => artist.draw(transform, target),
            Artist::Animated(artist) => artist.draw(transform, target),
        }
    }

    pub fn animated(&self) -> Option<&AnimatedSpriteArtist> {
        match self {
            Artist::Animated(artist) => Some(artist),
            Artist::Static(_) => None,
        }
    }

    pub fn animated_mut(&mut self) -> Option<&mut AnimatedSpriteArtist> {
        match self {
            Artist::Animated(artist) => Some(artist),
            Artist::Static(_) => None,
        }
    }
}

impl From<SpriteArtist> for Artist {
    fn from(artist: SpriteArtist) -> Self {
        Artist::Static(artist)
    }
}

impl From<AnimatedSpriteArtist> for Artist {
    fn from(artist: AnimatedSpriteArtist) -> Self {
        Artist::Animated(artist)
    }
}
