use crate::search::domain::error::SearchError;
use crate::search::domain::types::{DetectedFace, FaceSearchResponse, TextResult, TextSearchResponse};
use crate::search::domain::upload::UploadedImage;
use crate::shared::constants::{DEFAULT_THRESHOLD, DEFAULT_TOP_K};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    Face,
    Text,
}

/// Session status. A single enum value, so exactly one of the four states
/// holds at any instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Searching,
    Resulted,
    Error(String),
}

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    pub top_k: u32,
    /// Resolution of the threshold-change open question: when enabled, a
    /// threshold adjustment over a resulted search re-issues the same asset
    /// and face at the new value. Off by default; never assumed silently.
    pub rerun_on_threshold: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            rerun_on_threshold: false,
        }
    }
}

/// An issued face-search request. The generation is the staleness token;
/// threshold and top-k are snapshot at issue time, not bound to the asset.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceSearchTicket {
    pub generation: u64,
    pub top_k: u32,
    pub threshold: u8,
    pub face_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextSearchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

/// Outcome of feeding a response back into the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The response matched the newest issued request and mutated state.
    Current,
    /// A later request superseded this one; state was left untouched.
    Stale,
}

/// The search orchestrator: owns the session state machine and arbitrates
/// which response is authoritative.
///
/// Every request leaving the session carries a strictly increasing
/// generation. Responses are only applied when their generation still
/// matches; anything older is discarded silently. That discipline is what
/// keeps a fast reselect from being overwritten by a slow earlier request
/// resolving late.
pub struct SearchSession {
    config: SessionConfig,
    mode: SearchMode,
    status: SessionStatus,
    threshold: u8,
    generation: u64,
    upload: Option<UploadedImage>,
    selected_face: Option<usize>,
    faces_detected: usize,
    faces: Vec<DetectedFace>,
    text_results: Vec<TextResult>,
    last_text_query: Option<String>,
    /// Set when a completed non-empty query returned nothing; cleared only
    /// by the next completed non-empty query.
    empty_text_query: Option<String>,
}

impl SearchSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            mode: SearchMode::Face,
            status: SessionStatus::Idle,
            threshold: DEFAULT_THRESHOLD,
            generation: 0,
            upload: None,
            selected_face: None,
            faces_detected: 0,
            faces: Vec::new(),
            text_results: Vec::new(),
            last_text_query: None,
            empty_text_query: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_searching(&self) -> bool {
        self.status == SessionStatus::Searching
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn upload(&self) -> Option<&UploadedImage> {
        self.upload.as_ref()
    }

    pub fn selected_face(&self) -> Option<usize> {
        self.selected_face
    }

    pub fn faces_detected(&self) -> usize {
        self.faces_detected
    }

    pub fn faces(&self) -> &[DetectedFace] {
        &self.faces
    }

    pub fn text_results(&self) -> &[TextResult] {
        &self.text_results
    }

    pub fn empty_text_query(&self) -> Option<&str> {
        self.empty_text_query.as_deref()
    }

    /// Upload resulted but the recognition service saw no face at all.
    /// A valid terminal state, shown explicitly, never an error.
    pub fn no_faces_found(&self) -> bool {
        self.status == SessionStatus::Resulted
            && self.upload.is_some()
            && self.faces_detected == 0
    }

    /// More than one face and the operator hasn't picked one yet: the
    /// overlay picker is shown and the match grid stays hidden.
    pub fn needs_disambiguation(&self) -> bool {
        self.status == SessionStatus::Resulted
            && self.faces_detected > 1
            && self.selected_face.is_none()
    }

    /// The face whose matches the grid currently shows, if any.
    pub fn grid_face(&self) -> Option<(usize, &DetectedFace)> {
        if self.status != SessionStatus::Resulted {
            return None;
        }
        let index = self.selected_face?;
        self.faces.get(index).map(|f| (index, f))
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Clamp and store the slider value. Adjusting the slider never issues
    /// a request by itself; the value is snapshot into the next ticket.
    pub fn set_threshold(&mut self, value: i64) {
        self.threshold = value.clamp(0, 100) as u8;
    }

    pub fn set_top_k(&mut self, top_k: u32) {
        self.config.top_k = top_k;
    }

    pub fn set_rerun_on_threshold(&mut self, enabled: bool) {
        self.config.rerun_on_threshold = enabled;
    }

    /// The threshold-change open question, resolved by configuration: with
    /// `rerun_on_threshold` on and a search already resulted for the current
    /// asset, committing a new slider value re-issues the same asset and
    /// face selection at that value. Off (the default) issues nothing.
    pub fn threshold_rerun_ticket(&mut self) -> Option<FaceSearchTicket> {
        if self.config.rerun_on_threshold
            && self.upload.is_some()
            && self.status == SessionStatus::Resulted
        {
            return Some(self.issue_face_ticket(self.selected_face));
        }
        None
    }

    /// New asset: forget previous detections, invalidate pending requests.
    pub fn begin_upload_search(&mut self, upload: UploadedImage) -> FaceSearchTicket {
        self.upload = Some(upload);
        self.selected_face = None;
        self.faces_detected = 0;
        self.faces.clear();
        self.issue_face_ticket(None)
    }

    /// Re-search the already uploaded asset for one specific detected face.
    /// Legal from `Resulted` and from `Error` (a reselect is the documented
    /// recovery action). Returns `None` when there is nothing to reselect.
    pub fn begin_face_reselect(&mut self, index: usize) -> Option<FaceSearchTicket> {
        if self.upload.is_none() || index >= self.faces.len() {
            return None;
        }
        self.selected_face = Some(index);
        Some(self.issue_face_ticket(Some(index)))
    }

    /// Back to the disambiguation picker. Only meaningful with several
    /// detected faces; a single-face result is never left unselected.
    pub fn clear_face_selection(&mut self) {
        if self.faces_detected > 1 {
            self.selected_face = None;
        }
    }

    /// Arbitration point for face responses. Stale generations leave all
    /// state untouched and are never surfaced to the operator.
    pub fn apply_face_response(
        &mut self,
        generation: u64,
        result: Result<FaceSearchResponse, SearchError>,
    ) -> Applied {
        if generation != self.generation {
            log::debug!(
                "discarding stale face response (generation {generation}, current {})",
                self.generation
            );
            return Applied::Stale;
        }

        match result {
            Err(e) => self.status = SessionStatus::Error(e.to_string()),
            Ok(resp) => {
                if let Some(message) = resp.error {
                    self.status = SessionStatus::Error(message);
                    return Applied::Current;
                }
                self.faces_detected = resp.faces_detected;
                self.faces = resp.results;
                for face in &mut self.faces {
                    for m in &mut face.matches {
                        m.similarity = m.similarity.clamp(0.0, 100.0);
                    }
                }
                if self.faces_detected == 1 {
                    // Single face: skip disambiguation entirely.
                    self.selected_face = Some(0);
                } else if self
                    .selected_face
                    .is_some_and(|i| i >= self.faces.len())
                {
                    self.selected_face = None;
                }
                self.status = SessionStatus::Resulted;
            }
        }
        Applied::Current
    }

    /// Issue a text search. Empty and whitespace-only queries issue nothing
    /// and change nothing: an existing error or empty-result marker stays
    /// visible until a non-empty query actually completes.
    pub fn begin_text_search(&mut self, query: &str, page: u32) -> Option<TextSearchTicket> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.generation += 1;
        self.status = SessionStatus::Searching;
        self.last_text_query = Some(trimmed.to_string());
        Some(TextSearchTicket {
            generation: self.generation,
            query: trimmed.to_string(),
            page,
        })
    }

    pub fn apply_text_response(
        &mut self,
        generation: u64,
        result: Result<TextSearchResponse, SearchError>,
    ) -> Applied {
        if generation != self.generation {
            log::debug!(
                "discarding stale text response (generation {generation}, current {})",
                self.generation
            );
            return Applied::Stale;
        }

        match result {
            Err(e) => self.status = SessionStatus::Error(e.to_string()),
            Ok(resp) => {
                self.empty_text_query = if resp.results.is_empty() {
                    self.last_text_query.clone()
                } else {
                    None
                };
                self.text_results = resp.results;
                self.status = SessionStatus::Resulted;
            }
        }
        Applied::Current
    }

    /// Teardown: drop the asset reference and all result state.
    pub fn reset(&mut self) {
        let config = self.config;
        let mode = self.mode;
        let threshold = self.threshold;
        let generation = self.generation;
        *self = Self::new(config);
        self.mode = mode;
        self.threshold = threshold;
        // Past the last issued ticket, so pre-reset responses stay stale.
        self.generation = generation + 1;
    }

    fn issue_face_ticket(&mut self, face_index: Option<usize>) -> FaceSearchTicket {
        self.generation += 1;
        self.status = SessionStatus::Searching;
        FaceSearchTicket {
            generation: self.generation,
            top_k: self.config.top_k,
            threshold: self.threshold,
            face_index,
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::domain::types::FaceMatch;
    use crate::shared::bounding_box::BoundingBox;
    use rstest::rstest;
    use std::path::PathBuf;

    fn upload() -> UploadedImage {
        UploadedImage {
            path: PathBuf::from("/tmp/query.jpg"),
            natural_width: 1920,
            natural_height: 1080,
        }
    }

    fn matched_face(x: f32, similarity: f32) -> DetectedFace {
        DetectedFace {
            bbox: Some(BoundingBox::new(x, 10.0, x + 100.0, 130.0)),
            matches: vec![FaceMatch {
                similarity,
                crop_path: Some(format!("/mnt/qnap_photos/crops/{x}.jpg")),
                photo_path: None,
                person: None,
                context: None,
            }],
        }
    }

    fn response(faces: Vec<DetectedFace>) -> FaceSearchResponse {
        FaceSearchResponse {
            faces_detected: faces.len(),
            results: faces,
            error: None,
        }
    }

    fn network_err() -> SearchError {
        SearchError::Network {
            message: "connection reset".into(),
        }
    }

    // ── Threshold ────────────────────────────────────────────────────

    #[rstest]
    #[case(-20, 0)]
    #[case(0, 0)]
    #[case(55, 55)]
    #[case(100, 100)]
    #[case(250, 100)]
    fn test_threshold_clamped(#[case] input: i64, #[case] expected: u8) {
        let mut s = SearchSession::default();
        s.set_threshold(input);
        assert_eq!(s.threshold(), expected);
    }

    #[test]
    fn test_threshold_change_alone_issues_nothing_by_default() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 90.0)])));
        s.set_threshold(75);
        assert_eq!(s.threshold_rerun_ticket(), None);
        assert_eq!(*s.status(), SessionStatus::Resulted);
    }

    #[test]
    fn test_threshold_rerun_flag_reissues_same_face() {
        let mut s = SearchSession::new(SessionConfig {
            rerun_on_threshold: true,
            ..SessionConfig::default()
        });
        let t = s.begin_upload_search(upload());
        s.apply_face_response(
            t.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(200.0, 80.0)])),
        );
        let t2 = s.begin_face_reselect(1).unwrap();
        s.apply_face_response(
            t2.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(200.0, 80.0)])),
        );

        s.set_threshold(80);
        let rerun = s.threshold_rerun_ticket().expect("flag should re-issue");
        assert_eq!(rerun.threshold, 80);
        assert_eq!(rerun.face_index, Some(1));
        assert!(rerun.generation > t2.generation);
        assert!(s.is_searching());
    }

    #[test]
    fn test_threshold_rerun_flag_inert_without_upload() {
        let mut s = SearchSession::new(SessionConfig {
            rerun_on_threshold: true,
            ..SessionConfig::default()
        });
        s.set_threshold(80);
        assert_eq!(s.threshold_rerun_ticket(), None);
        assert_eq!(*s.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_ticket_snapshots_threshold_at_issue_time() {
        let mut s = SearchSession::default();
        s.set_threshold(30);
        let t1 = s.begin_upload_search(upload());
        assert_eq!(t1.threshold, 30);

        // Slider moves while the request is in flight; only the next
        // issued request sees the new value.
        s.set_threshold(70);
        s.apply_face_response(
            t1.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(200.0, 50.0)])),
        );
        let t2 = s.begin_face_reselect(0).unwrap();
        assert_eq!(t2.threshold, 70);
    }

    // ── Upload / auto-select / disambiguation ────────────────────────

    #[test]
    fn test_upload_transitions_to_searching() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        assert!(s.is_searching());
        assert_eq!(t.face_index, None);
        assert_eq!(t.top_k, DEFAULT_TOP_K);
        assert_eq!(s.selected_face(), None);
    }

    #[test]
    fn test_single_face_auto_selected() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 88.0)])));
        assert_eq!(s.selected_face(), Some(0));
        assert!(s.grid_face().is_some());
        assert!(!s.needs_disambiguation());
    }

    #[test]
    fn test_multiple_faces_require_explicit_choice() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(
            t.generation,
            Ok(response(vec![matched_face(0.0, 88.0), matched_face(300.0, 70.0)])),
        );
        assert_eq!(s.selected_face(), None);
        assert!(s.needs_disambiguation());
        // No grid until the operator picks an overlay.
        assert!(s.grid_face().is_none());
    }

    #[test]
    fn test_zero_faces_is_valid_empty_state() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![])));
        assert_eq!(*s.status(), SessionStatus::Resulted);
        assert!(s.no_faces_found());
        assert!(s.grid_face().is_none());
        assert!(s.error_message().is_none());
    }

    #[test]
    fn test_two_face_scenario_reselect_shows_only_chosen_face() {
        let mut s = SearchSession::default();
        s.set_threshold(50);
        let t = s.begin_upload_search(upload());
        assert_eq!(t.threshold, 50);
        assert_eq!(t.top_k, 20);

        s.apply_face_response(
            t.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(300.0, 75.0)])),
        );

        // Clicking overlay #2 issues face_index = 1 against the same asset.
        let t2 = s.begin_face_reselect(1).expect("faces exist");
        assert_eq!(t2.face_index, Some(1));
        assert!(s.is_searching());

        let refreshed = vec![matched_face(0.0, 90.0), matched_face(300.0, 75.0)];
        s.apply_face_response(t2.generation, Ok(response(refreshed)));
        let (index, face) = s.grid_face().expect("grid visible after choice");
        assert_eq!(index, 1);
        assert_eq!(face.matches[0].similarity, 75.0);
    }

    #[test]
    fn test_reselect_without_upload_is_refused() {
        let mut s = SearchSession::default();
        assert!(s.begin_face_reselect(0).is_none());
    }

    #[test]
    fn test_reselect_out_of_range_is_refused() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 88.0)])));
        assert!(s.begin_face_reselect(5).is_none());
    }

    #[test]
    fn test_back_to_choice_only_with_multiple_faces() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 88.0)])));
        s.clear_face_selection();
        // One detected face: the selection must never go back to None.
        assert_eq!(s.selected_face(), Some(0));

        let t = s.begin_upload_search(upload());
        s.apply_face_response(
            t.generation,
            Ok(response(vec![matched_face(0.0, 88.0), matched_face(300.0, 70.0)])),
        );
        let t2 = s.begin_face_reselect(0).unwrap();
        s.apply_face_response(
            t2.generation,
            Ok(response(vec![matched_face(0.0, 88.0), matched_face(300.0, 70.0)])),
        );
        s.clear_face_selection();
        assert_eq!(s.selected_face(), None);
        assert!(s.needs_disambiguation());
    }

    // ── Staleness / ordering ─────────────────────────────────────────

    #[test]
    fn test_late_response_for_superseded_request_is_discarded() {
        let mut s = SearchSession::default();
        let t1 = s.begin_upload_search(upload());
        s.apply_face_response(
            t1.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(300.0, 70.0)])),
        );

        // Operator reselects; the slow original request resolves afterwards.
        let t2 = s.begin_face_reselect(1).unwrap();
        let stale = s.apply_face_response(t1.generation, Ok(response(vec![matched_face(0.0, 10.0)])));
        assert_eq!(stale, Applied::Stale);
        // The stale payload must not have leaked into displayed state.
        assert!(s.is_searching());
        assert_eq!(s.faces()[0].matches[0].similarity, 90.0);

        let fresh = s.apply_face_response(
            t2.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(300.0, 70.0)])),
        );
        assert_eq!(fresh, Applied::Current);
        assert_eq!(s.grid_face().unwrap().0, 1);
    }

    #[test]
    fn test_out_of_order_arrival_newest_always_wins() {
        let mut s = SearchSession::default();
        let t1 = s.begin_upload_search(upload());
        let t2 = s.begin_upload_search(upload());

        // t2's response lands first, then t1's arrives late.
        assert_eq!(
            s.apply_face_response(t2.generation, Ok(response(vec![matched_face(0.0, 95.0)]))),
            Applied::Current
        );
        assert_eq!(
            s.apply_face_response(t1.generation, Ok(response(vec![]))),
            Applied::Stale
        );
        assert_eq!(s.faces_detected(), 1);
        assert_eq!(s.selected_face(), Some(0));
    }

    #[test]
    fn test_stale_error_cannot_clobber_fresh_result() {
        let mut s = SearchSession::default();
        let t1 = s.begin_upload_search(upload());
        let t2 = s.begin_upload_search(upload());
        s.apply_face_response(t2.generation, Ok(response(vec![matched_face(0.0, 95.0)])));
        assert_eq!(
            s.apply_face_response(t1.generation, Err(network_err())),
            Applied::Stale
        );
        assert_eq!(*s.status(), SessionStatus::Resulted);
    }

    #[test]
    fn test_generations_strictly_increase() {
        let mut s = SearchSession::default();
        let a = s.begin_upload_search(upload());
        s.apply_face_response(a.generation, Ok(response(vec![matched_face(0.0, 90.0), matched_face(1.0, 9.0)])));
        let b = s.begin_face_reselect(0).unwrap();
        let c = s.begin_text_search("anything", 1).unwrap();
        assert!(a.generation < b.generation && b.generation < c.generation);
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn test_transport_failure_becomes_error_state() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Err(network_err()));
        assert_eq!(s.error_message(), Some("request failed: connection reset"));
    }

    #[test]
    fn test_inband_backend_error_becomes_error_state() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(
            t.generation,
            Ok(FaceSearchResponse {
                faces_detected: 0,
                results: vec![],
                error: Some("unsupported image format".into()),
            }),
        );
        assert_eq!(s.error_message(), Some("unsupported image format"));
    }

    #[test]
    fn test_new_upload_clears_error_into_searching() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Err(network_err()));
        s.begin_upload_search(upload());
        assert!(s.is_searching());
        assert!(s.error_message().is_none());
    }

    #[test]
    fn test_reselect_clears_error_into_searching() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(
            t.generation,
            Ok(response(vec![matched_face(0.0, 90.0), matched_face(300.0, 70.0)])),
        );
        let t2 = s.begin_face_reselect(0).unwrap();
        s.apply_face_response(t2.generation, Err(network_err()));
        assert!(s.error_message().is_some());

        assert!(s.begin_face_reselect(1).is_some());
        assert!(s.is_searching());
    }

    #[test]
    fn test_backend_match_list_displayed_unfiltered() {
        // Threshold filtering belongs to the recognition service; whatever
        // came back is shown, even below the current slider value.
        let mut s = SearchSession::default();
        s.set_threshold(90);
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 35.0)])));
        assert_eq!(s.faces()[0].matches[0].similarity, 35.0);
    }

    #[test]
    fn test_similarity_clamped_on_apply() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 130.0)])));
        assert_eq!(s.faces()[0].matches[0].similarity, 100.0);
    }

    // ── Text protocol ────────────────────────────────────────────────

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_empty_query_issues_nothing(#[case] query: &str) {
        let mut s = SearchSession::default();
        let gen_before = s.generation();
        assert!(s.begin_text_search(query, 1).is_none());
        assert_eq!(s.generation(), gen_before);
        assert_eq!(*s.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_empty_query_does_not_clear_existing_markers() {
        let mut s = SearchSession::default();
        let t = s.begin_text_search("nothing matches this", 1).unwrap();
        s.apply_text_response(t.generation, Ok(TextSearchResponse::default()));
        assert_eq!(s.empty_text_query(), Some("nothing matches this"));

        assert!(s.begin_text_search("  ", 1).is_none());
        assert_eq!(s.empty_text_query(), Some("nothing matches this"));
    }

    #[test]
    fn test_completed_query_clears_stale_empty_marker() {
        let mut s = SearchSession::default();
        let t = s.begin_text_search("no hits", 1).unwrap();
        s.apply_text_response(t.generation, Ok(TextSearchResponse::default()));
        assert!(s.empty_text_query().is_some());

        let t2 = s.begin_text_search("shipment", 1).unwrap();
        assert_eq!(t2.query, "shipment");
        s.apply_text_response(
            t2.generation,
            Ok(TextSearchResponse {
                results: vec![TextResult {
                    id: 1,
                    group_name: Some("market".into()),
                    sender_name: None,
                    timestamp: None,
                    text: "shipment arrives".into(),
                }],
            }),
        );
        assert!(s.empty_text_query().is_none());
        assert_eq!(s.text_results().len(), 1);
    }

    #[test]
    fn test_query_is_trimmed_into_ticket() {
        let mut s = SearchSession::default();
        let t = s.begin_text_search("  cargo \n", 3).unwrap();
        assert_eq!(t.query, "cargo");
        assert_eq!(t.page, 3);
    }

    #[test]
    fn test_stale_text_response_discarded() {
        let mut s = SearchSession::default();
        let t1 = s.begin_text_search("first", 1).unwrap();
        let t2 = s.begin_text_search("second", 1).unwrap();
        assert_eq!(
            s.apply_text_response(t1.generation, Ok(TextSearchResponse::default())),
            Applied::Stale
        );
        assert!(s.is_searching());
        assert_eq!(
            s.apply_text_response(t2.generation, Ok(TextSearchResponse::default())),
            Applied::Current
        );
        assert_eq!(s.empty_text_query(), Some("second"));
    }

    // ── Reset ────────────────────────────────────────────────────────

    #[test]
    fn test_reset_drops_results_but_keeps_generation_monotone() {
        let mut s = SearchSession::default();
        let t = s.begin_upload_search(upload());
        s.reset();
        assert_eq!(*s.status(), SessionStatus::Idle);
        assert!(s.upload().is_none());
        // A response from before the reset must still be stale.
        assert_eq!(
            s.apply_face_response(t.generation, Ok(response(vec![matched_face(0.0, 1.0)]))),
            Applied::Stale
        );
    }
}
