use std::sync::Arc;

use glam::Vec2;
use winit::dpi::LogicalPosition;
use winit::window::Window;

use crate::error::HostError;
use crate::sprite::SpriteFrame;

/// Commands the engine issues to the window it lives in.
/// All calls are fire-and-forget; the engine logs failures and moves on.
pub trait HostBridge {
    /// Logical screen size (width, height).
    fn screen_size(&mut self) -> Result<(u32, u32), HostError>;
    /// Move the window's top-left corner (logical pixels).
    fn set_position(&mut self, pos: Vec2) -> Result<(), HostError>;
    /// `true` lets pointer events fall through to windows below.
    fn set_ignore_cursor_events(&mut self, ignore: bool) -> Result<(), HostError>;
    fn show_sprite(&mut self, frame: SpriteFrame);
    fn set_sleep_indicator(&mut self, visible: bool);
}

/// Host bridge over a winit window.
pub struct WinitHost {
    window: Arc<Window>,
    frame: Option<SpriteFrame>,
    sleep_indicator: bool,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            frame: None,
            sleep_indicator: false,
        }
    }

    fn refresh_title(&self) {
        let Some(frame) = self.frame else {
            return;
        };
        let mut title = format!("Chill - {}", frame.sprite.path());
        if frame.mirrored {
            title.push_str(" (mirrored)");
        }
        if self.sleep_indicator {
            title.push_str(" zZz");
        }
        self.window.set_title(&title);
    }
}

impl HostBridge for WinitHost {
    fn screen_size(&mut self) -> Result<(u32, u32), HostError> {
        let monitor = self
            .window
            .current_monitor()
            .or_else(|| self.window.primary_monitor())
            .ok_or(HostError::NoMonitor)?;
        let size = monitor.size().to_logical::<f64>(monitor.scale_factor());
        Ok((size.width.round() as u32, size.height.round() as u32))
    }

    fn set_position(&mut self, pos: Vec2) -> Result<(), HostError> {
        self.window
            .set_outer_position(LogicalPosition::new(pos.x as f64, pos.y as f64));
        Ok(())
    }

    fn set_ignore_cursor_events(&mut self, ignore: bool) -> Result<(), HostError> {
        self.window.set_cursor_hittest(!ignore)?;
        Ok(())
    }

    fn show_sprite(&mut self, frame: SpriteFrame) {
        log::debug!("Sprite -> {} (mirrored: {})", frame.sprite.path(), frame.mirrored);
        self.frame = Some(frame);
        self.refresh_title();
    }

    fn set_sleep_indicator(&mut self, visible: bool) {
        if self.sleep_indicator != visible {
            self.sleep_indicator = visible;
            self.refresh_title();
        }
    }
}

/// Every command the engine sent, in order.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ScreenSize,
    SetPosition(Vec2),
    IgnoreCursor(bool),
    Sprite(SpriteFrame),
    SleepIndicator(bool),
}

/// Test double that records commands and answers with canned geometry.
#[cfg(test)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub screen: Option<(u32, u32)>,
}

#[cfg(test)]
impl RecordingHost {
    pub fn new(screen: Option<(u32, u32)>) -> Self {
        Self {
            calls: Vec::new(),
            screen,
        }
    }

    pub fn last_sprite(&self) -> Option<SpriteFrame> {
        self.calls.iter().rev().find_map(|c| match c {
            HostCall::Sprite(frame) => Some(*frame),
            _ => None,
        })
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::SetPosition(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl HostBridge for RecordingHost {
    fn screen_size(&mut self) -> Result<(u32, u32), HostError> {
        self.calls.push(HostCall::ScreenSize);
        self.screen.ok_or(HostError::NoMonitor)
    }

    fn set_position(&mut self, pos: Vec2) -> Result<(), HostError> {
        self.calls.push(HostCall::SetPosition(pos));
        Ok(())
    }

    fn set_ignore_cursor_events(&mut self, ignore: bool) -> Result<(), HostError> {
        self.calls.push(HostCall::IgnoreCursor(ignore));
        Ok(())
    }

    fn show_sprite(&mut self, frame: SpriteFrame) {
        self.calls.push(HostCall::Sprite(frame));
    }

    fn set_sleep_indicator(&mut self, visible: bool) {
        self.calls.push(HostCall::SleepIndicator(visible));
    }
}
