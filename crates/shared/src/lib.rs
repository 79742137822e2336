//! Roster wire types.
//!
//! JSON shapes exchanged over the HTTP API:
//! - request bodies and query strings (`requests`)
//! - the `{data}` success envelope and `{errorMessage, errorCode}` error body (`responses`)
//!
//! No business logic lives here; bodies convert into domain types at the edge.

pub mod requests;
pub mod responses;

pub use requests::{CharacterInput, ListCharactersQuery};
pub use responses::{DataResponse, ErrorCode, ErrorResponse};
