// WASM utility functions

/// Whether the browser reports a dark colour-scheme preference. Falls back to
/// light when `matchMedia` is unavailable.
pub fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// Current viewport width in CSS pixels, if known
pub fn viewport_width() -> Option<u32> {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w as u32)
}
