//! HTTP API handlers for outreach-dash

pub mod buildinfo;
pub mod churches;
pub mod dashboard;
pub mod health;
pub mod session;
pub mod ui;

pub use buildinfo::get_build_info;
pub use churches::list_churches;
pub use dashboard::{get_audit, get_contacts, get_monthly, get_stages, get_status, get_timeline};
pub use health::health_routes;
pub use session::{login, logout, session_middleware, session_status, SessionGate};
pub use ui::{serve_app_js, serve_index};
