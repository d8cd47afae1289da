pub mod error;
pub mod http;
pub mod session;
pub mod traits;

pub use error::{ApiError, Result, SessionError};
pub use http::HttpTutorClient;
pub use session::{
    AuthToken, FileTokenStore, MemoryTokenStore, SessionGuard, TokenStore, AUTH_HEADER, TOKEN_KEY,
};
pub use traits::TutorBackend;
