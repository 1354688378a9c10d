//! # rentline-app
//!
//! The application shell: session state, the sidebar panel controller,
//! role-tagged navigation menus, the thread view model, and the financial
//! summary.  Everything here is headless — view models produce rows,
//! labels and scroll requests for a rendering surface to consume.

pub mod finance;
pub mod menu;
pub mod panel;
pub mod state;
pub mod thread_view;

mod error;

pub use error::AppError;
pub use panel::SidebarController;
pub use state::AppState;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for the application process.  Respects `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("rentline_app=debug,rentline_sync=debug,rentline_store=info,rentline_storage=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
