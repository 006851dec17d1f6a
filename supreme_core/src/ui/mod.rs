// UI component models
// Host-independent state for the page widgets; hosts render from these

pub mod cart_panel;
pub mod counter;
pub mod mobile_search;
pub mod modal;
pub mod navigation;
pub mod scroll;
pub mod search_box;
pub mod toast;

pub use cart_panel::{CartPanel, PanelEvent};
pub use counter::{format_count, Counter};
pub use mobile_search::MobileSearch;
pub use modal::ModalManager;
pub use navigation::Navigation;
pub use scroll::{ScrollEffects, ScrollState};
pub use search_box::{PanelContent, PanelVisibility, SearchBox};
pub use toast::{Notifier, Toast, ToastKind, ToastPhase, ToastSurface};
