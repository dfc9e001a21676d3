//! Score, lives and win/lose state for one play-through.

use log::info;

use crate::components::StatusFlags;
use crate::world::ObjectManager;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    Won,
    Lost,
}

/// Things that happened during a frame, drained by the host (sound cues, HUD).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Jumped,
    PickupCollected { id: String, value: u32 },
    PlayerHit { lives_left: u32 },
    Won { score: u32 },
    Lost { score: u32 },
}

#[derive(Debug)]
pub struct GameSession {
    score: u32,
    lives: u32,
    target_score: u32,
    state: GameState,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(lives: u32, target_score: u32) -> Self {
        Self {
            score: 0,
            lives,
            target_score,
            state: GameState::Menu,
            events: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Won | GameState::Lost)
    }

    /// Leaves the menu and lets the manager update.
    pub fn start(&mut self, manager: &mut ObjectManager) {
        if self.state != GameState::Menu {
            return;
        }
        self.state = GameState::Playing;
        manager.set_status(StatusFlags::DRAWN | StatusFlags::UPDATED);
        self.events.push(GameEvent::Started);
        info!("Game started: {} lives, target score {}", self.lives, self.target_score);
    }

    pub fn toggle_pause(&mut self, manager: &mut ObjectManager) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                manager.set_status(StatusFlags::DRAWN | StatusFlags::UPDATED | StatusFlags::PAUSED);
                self.events.push(GameEvent::Paused);
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                manager.set_status(StatusFlags::DRAWN | StatusFlags::UPDATED);
                self.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    pub fn jumped(&mut self) {
        self.events.push(GameEvent::Jumped);
    }

    pub fn collect(&mut self, id: &str, value: u32) {
        if self.is_over() {
            return;
        }
        self.score = self.score.saturating_add(value);
        self.events.push(GameEvent::PickupCollected {
            id: id.to_string(),
            value,
        });
        if self.target_score > 0 && self.score >= self.target_score {
            self.state = GameState::Won;
            self.events.push(GameEvent::Won { score: self.score });
            info!("Target score reached: {}", self.score);
        }
    }

    pub fn lose_life(&mut self) {
        if self.is_over() {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerHit {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.state = GameState::Lost;
            self.events.push(GameEvent::Lost { score: self.score });
            info!("Out of lives with score {}", self.score);
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One-line HUD summary.
    pub fn hud_text(&self) -> String {
        let status = match self.state {
            GameState::Menu => "Press Enter to start",
            GameState::Playing => "",
            GameState::Paused => "Paused (P to resume)",
            GameState::Won => "You win!",
            GameState::Lost => "Game over",
        };
        format!(
            "Score: {:4}   Lives: {}   {}",
            self.score, self.lives, status
        )
    }
}
