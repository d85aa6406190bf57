use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One fetched asset. `bytes` is `None` when the load failed; the UI hides
/// that image instead of rendering a broken placeholder.
pub struct PhotoMessage {
    pub url: String,
    pub bytes: Option<Vec<u8>>,
}

/// Fetch a batch of match/context photos in the background.
///
/// Failures are per-asset: one broken photo never aborts the batch. The
/// worker stops early if the UI dropped the receiver.
pub fn spawn(urls: Vec<String>, token: Option<String>) -> Receiver<PhotoMessage> {
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        let client = match reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::warn!("photo loader could not build client: {e}");
                for url in urls {
                    let _ = tx.send(PhotoMessage { url, bytes: None });
                }
                return;
            }
        };

        for url in urls {
            let bytes = match fetch(&client, &url, token.as_deref()) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("photo load failed for {url}: {e}");
                    None
                }
            };
            if tx.send(PhotoMessage { url, bytes }).is_err() {
                return;
            }
        }
    });
    rx
}

fn fetch(
    client: &reqwest::blocking::Client,
    url: &str,
    token: Option<&str>,
) -> Result<Vec<u8>, reqwest::Error> {
    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}
