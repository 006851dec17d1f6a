// Responsive navigation menu

use crate::settings::Settings;

pub struct Navigation {
    open: bool,
    breakpoint: u32,
}

impl Navigation {
    pub fn new(settings: &Settings) -> Self {
        Self {
            open: false,
            breakpoint: settings.nav_breakpoint_px,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Following a link closes the menu on mobile widths
    pub fn on_link_click(&mut self, viewport_width: u32) {
        if viewport_width <= self.breakpoint {
            self.close();
        }
    }

    /// Growing past the breakpoint closes the mobile menu
    pub fn on_resize(&mut self, viewport_width: u32) {
        if viewport_width > self.breakpoint {
            self.close();
        }
    }

    pub fn on_outside_click(&mut self) {
        self.close();
    }
}

/// Index of the link matching the current path. The site root matches a link
/// to `index.html`.
pub fn active_link(current_path: &str, link_paths: &[&str]) -> Option<usize> {
    link_paths.iter().position(|link| {
        *link == current_path || (current_path == "/" && link.contains("index.html"))
    })
}
