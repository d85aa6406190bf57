use std::path::PathBuf;
use std::thread;

use crossbeam_channel::Receiver;

use facewatch_core::search::domain::error::SearchError;
use facewatch_core::search::domain::search_backend::SearchBackend;
use facewatch_core::search::domain::session::{FaceSearchTicket, TextSearchTicket};
use facewatch_core::search::domain::types::{FaceSearchResponse, TextSearchResponse};

/// Terminal message from a search worker. Exactly one is sent per spawned
/// request, carrying the generation of the ticket that issued it; the
/// session decides whether it is still authoritative.
pub enum SearchWorkerMessage {
    Face(u64, Result<FaceSearchResponse, SearchError>),
    Text(u64, Result<TextSearchResponse, SearchError>),
}

/// Run one face search on a background thread.
///
/// The UI polls the returned receiver. When a newer request replaces this
/// one, the receiver is dropped and the worker's final send fails on the
/// closed channel; the thread just exits — displayed state is protected by
/// the generation check either way.
pub fn spawn_face(
    backend: Box<dyn SearchBackend>,
    photo: PathBuf,
    ticket: FaceSearchTicket,
) -> Receiver<SearchWorkerMessage> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let result = backend.search_by_face(&photo, &ticket);
        let _ = tx.send(SearchWorkerMessage::Face(ticket.generation, result));
    });
    rx
}

/// Run one text search on a background thread.
pub fn spawn_text(
    backend: Box<dyn SearchBackend>,
    ticket: TextSearchTicket,
) -> Receiver<SearchWorkerMessage> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let result = backend.search_by_text(&ticket);
        let _ = tx.send(SearchWorkerMessage::Text(ticket.generation, result));
    });
    rx
}
