mod client;
mod oauth;

pub use client::{CallId, CallWindow, GongApi, Relayed};
pub use oauth::GongOAuth;
