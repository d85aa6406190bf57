use std::path::PathBuf;
use std::process;

use clap::Parser;

use facewatch_core::auth::credential_context::CredentialContext;
use facewatch_core::search::domain::search_backend::SearchBackend;
use facewatch_core::search::domain::session::{SearchSession, SessionConfig};
use facewatch_core::search::domain::types::{DetectedFace, TextResult};
use facewatch_core::search::domain::upload::select_upload;
use facewatch_core::search::infrastructure::http_backend::HttpSearchBackend;
use facewatch_core::shared::asset_path::public_asset_url;
use facewatch_core::shared::constants::{DEFAULT_THRESHOLD, DEFAULT_TOP_K};

/// Search the face database by photo, or the message archive by text.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Photo to match against the face database.
    photo: Option<PathBuf>,

    /// Text query against the message archive (instead of a photo).
    #[arg(long)]
    text: Option<String>,

    /// Result page for text search.
    #[arg(long, default_value = "1")]
    page: u32,

    /// Ranked candidates to request per detected face.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: u32,

    /// Minimum similarity percentage (0-100).
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Restrict the photo search to one detected face (0-based).
    #[arg(long)]
    face_index: Option<usize>,

    /// Backend base URL.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Bearer token; defaults to the persisted operator credential.
    #[arg(long)]
    token: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let credential = match &cli.token {
        Some(token) => CredentialContext::with_token(token),
        None => CredentialContext::hydrate(),
    };
    let backend = HttpSearchBackend::new(cli.api_url.clone(), credential);

    if let Some(query) = &cli.text {
        run_text_search(&backend, query, cli.page)
    } else {
        run_face_search(&backend, &cli)
    }
}

fn run_text_search(
    backend: &HttpSearchBackend,
    query: &str,
    page: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SearchSession::default();
    let ticket = session
        .begin_text_search(query, page)
        .ok_or("Text query must not be empty")?;

    let response = backend.search_by_text(&ticket)?;
    if response.results.is_empty() {
        println!("No messages matched \"{}\"", ticket.query);
        return Ok(());
    }
    for result in &response.results {
        print_text_result(result);
    }
    Ok(())
}

fn run_face_search(
    backend: &HttpSearchBackend,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let photo = cli.photo.as_ref().expect("validated");
    let uploaded = select_upload(std::slice::from_ref(photo))?;
    log::info!(
        "Uploading {} ({}x{})",
        uploaded.path.display(),
        uploaded.natural_width,
        uploaded.natural_height
    );

    let mut session = SearchSession::new(SessionConfig {
        top_k: cli.top_k,
        rerun_on_threshold: false,
    });
    session.set_threshold(cli.threshold as i64);

    let ticket = match cli.face_index {
        // The CLI has no disambiguation round trip; an explicit index is
        // issued directly against the fresh upload.
        Some(_) => {
            let mut t = session.begin_upload_search(uploaded.clone());
            t.face_index = cli.face_index;
            t
        }
        None => session.begin_upload_search(uploaded.clone()),
    };

    let result = backend.search_by_face(&uploaded.path, &ticket);
    let generation = ticket.generation;
    session.apply_face_response(generation, result);

    if let Some(message) = session.error_message() {
        return Err(message.to_string().into());
    }
    if session.no_faces_found() {
        println!("No face detected in the photo.");
        return Ok(());
    }

    println!("Faces detected: {}", session.faces_detected());
    for (index, face) in session.faces().iter().enumerate() {
        print_face(backend.api_base(), index, face);
    }
    Ok(())
}

fn print_face(api_base: &str, index: usize, face: &DetectedFace) {
    match face.bbox {
        Some(b) => println!(
            "\nFace #{} at [{:.0}, {:.0}, {:.0}, {:.0}]:",
            index + 1,
            b.x1,
            b.y1,
            b.x2,
            b.y2
        ),
        None => println!("\nFace #{}:", index + 1),
    }
    if face.matches.is_empty() {
        println!("  (no matches above threshold)");
        return;
    }
    for m in &face.matches {
        let label = m
            .person
            .as_ref()
            .map(|p| p.label())
            .unwrap_or_else(|| "Unidentified person".to_string());
        let asset = m
            .grid_path()
            .map(|p| public_asset_url(api_base, p))
            .unwrap_or_default();
        println!("  {:5.1}%  {label}  {asset}", m.similarity);
    }
}

fn print_text_result(result: &TextResult) {
    let group = result.group_name.as_deref().unwrap_or("-");
    let sender = result.sender_name.as_deref().unwrap_or("-");
    let when = result
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!("[{group}] {sender} {when}\n  {}", result.text);
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.photo.is_none() && cli.text.is_none() {
        return Err("Provide a photo to search by face, or --text for a text query".into());
    }
    if cli.photo.is_some() && cli.text.is_some() {
        return Err("Photo and --text are mutually exclusive".into());
    }
    if let Some(photo) = &cli.photo {
        if !photo.exists() {
            return Err(format!("Photo not found: {}", photo.display()).into());
        }
    }
    if cli.threshold > 100 {
        return Err(format!("Threshold must be between 0 and 100, got {}", cli.threshold).into());
    }
    if cli.top_k == 0 {
        return Err("--top-k must be at least 1".into());
    }
    if cli.page == 0 {
        return Err("--page starts at 1".into());
    }
    Ok(())
}
