//! Seams for the external services the app talks to. The bundled
//! implementations are offline stand-ins with a simulated network delay.

pub mod auth;
pub mod playlist;

pub use auth::{AuthService, AuthSession, LocalAuthService};
pub use playlist::{PlaylistSyncService, SimulatedYoutubeSync};
