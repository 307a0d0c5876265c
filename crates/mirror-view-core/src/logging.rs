//! Logging facilities for mirror-view.
//!
//! mirror-view uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("mirror_view=debug")
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so a filter such as
//! `mirror_view::drop=trace` isolates drop resolution.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "mirror_view_core::signal";
    /// Controller callback guard target.
    pub const CALLBACK: &str = "mirror_view_core::callback";
    /// Tree view orchestration target.
    pub const VIEW: &str = "mirror_view::view";
    /// Drag session target.
    pub const DRAG: &str = "mirror_view::drag";
    /// Drop resolution target.
    pub const DROP: &str = "mirror_view::drop";
    /// Inline editor target.
    pub const EDIT: &str = "mirror_view::edit";
    /// Icon registry target.
    pub const ICONS: &str = "mirror_view::icons";
    /// Configuration target.
    pub const CONFIG: &str = "mirror_view::config";
}

/// Span names used for tracing the heavier operations.
pub mod span_names {
    /// Full row rebuild after a refresh.
    pub const REFRESH: &str = "mirror_view::refresh";
    /// Drop validation and execution.
    pub const DROP: &str = "mirror_view::drop";
    /// Draining queued model events.
    pub const DISPATCH: &str = "mirror_view::dispatch";
}
