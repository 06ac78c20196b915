//! HTTP handlers for tsa-web

pub mod health;
pub mod login;
pub mod packs;
pub mod pages;
pub mod session;
pub mod sets;

pub use health::health_routes;
pub use login::{login, login_page};
pub use packs::{annotate_pack, show_pack};
pub use session::Annotator;
pub use sets::{home, next_set, start_next_set};
