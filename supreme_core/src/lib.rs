// Supreme Nutrition Core Library
// Platform-agnostic storefront state: catalog, cart, favorites, search, theme

pub mod models;
pub mod error;
pub mod catalog;
pub mod storage_trait;
pub mod persisted;
pub mod scheduler;
pub mod settings;
pub mod cart;
pub mod favorites;
pub mod search;
pub mod theme;
pub mod validation;
pub mod auth;
pub mod render;
pub mod ui;
pub mod storefront;

#[cfg(feature = "native")]
pub mod native;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

// Re-exports
pub use error::CoreError;
pub use models::*;
pub use settings::Settings;
pub use catalog::Catalog;
pub use storage_trait::*;
pub use persisted::PersistedCollection;
pub use scheduler::{elapsed_whole_millis, Scheduler, TaskId};
pub use cart::{Cart, CartSummary, MAX_LINE_QUANTITY};
pub use favorites::{FavoriteChange, Favorites};
pub use search::{ExecuteStatus, ResultsSink, Search, SearchOutcome, Suggestions};
pub use theme::ThemeManager;
pub use auth::{AuthFlow, LoginForm, RegisterForm, SubmitStatus};
pub use ui::{Notifier, ToastKind};
pub use storefront::{Storefront, StorefrontEvent, ViewState};
