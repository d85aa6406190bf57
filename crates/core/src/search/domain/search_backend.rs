use std::path::Path;

use crate::search::domain::error::SearchError;
use crate::search::domain::session::{FaceSearchTicket, TextSearchTicket};
use crate::search::domain::types::{FaceSearchResponse, TextSearchResponse};

/// Domain interface over the two search protocols.
///
/// Implementations are handed to worker threads, hence `Send`. Calls block
/// until the backend answers; the caller decides the threading model.
pub trait SearchBackend: Send {
    /// Upload `photo` and search the face database. The ticket carries
    /// top-k, threshold, and the optional target face index.
    fn search_by_face(
        &self,
        photo: &Path,
        ticket: &FaceSearchTicket,
    ) -> Result<FaceSearchResponse, SearchError>;

    /// Stateless ranked message search.
    fn search_by_text(&self, ticket: &TextSearchTicket) -> Result<TextSearchResponse, SearchError>;
}
