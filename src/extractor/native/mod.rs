//! Extractors that talk to a platform directly over HTTP

pub mod audiomack;
pub mod auth;
pub mod heuristics;
pub mod spotify;

pub use audiomack::AudiomackExtractor;
pub use auth::{AuthChain, ClientCredentials, CredentialProvider, StaticBearer};
pub use spotify::SpotifyExtractor;
