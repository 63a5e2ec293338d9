use std::time::Duration;

use super::{FeedError, SampleSource, Snapshot};

pub const AIRCRAFT_PATH: &str = "/data/aircraft.json";

/// Reads snapshots from a dump1090-style HTTP endpoint.
pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpFeed {
    pub fn new(base_url: &str) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), AIRCRAFT_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single request bounded by `timeout`. Only reachability matters; the
    /// body is not inspected.
    pub async fn check_reachable(&self, timeout: Duration) -> Result<(), FeedError> {
        let response = self.client.get(&self.url).timeout(timeout).send().await?;
        log::info!("reachability check {} -> {}", self.url, response.status());
        Ok(())
    }

    async fn get_snapshot(&self) -> Result<Snapshot, FeedError> {
        log::debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.text().await?;
        log::debug!("response body: {}", body.trim());

        Ok(serde_json::from_str(&body)?)
    }
}

impl SampleSource for HttpFeed {
    async fn fetch(&self) -> Result<Snapshot, FeedError> {
        self.get_snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn fetches_snapshot_from_server() {
        let app = Router::new().route(
            AIRCRAFT_PATH,
            get(|| async {
                r#"{"now": 1000.0, "aircraft": [{"lat": -34.95, "lon": 138.75, "gs": 91.0, "track": 180.0}]}"#
            }),
        );
        let base = serve(app).await;

        let feed = HttpFeed::new(&format!("{}/", base)).unwrap();
        assert_eq!(feed.url(), format!("{}{}", base, AIRCRAFT_PATH));

        feed.check_reachable(Duration::from_secs(2)).await.unwrap();
        let snapshot = feed.fetch().await.unwrap();
        assert_eq!(snapshot.now, 1000.0);
        assert_eq!(snapshot.first_aircraft().unwrap().gs, 91.0);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let app = Router::new().route(
            AIRCRAFT_PATH,
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "warming up") }),
        );
        let feed = HttpFeed::new(&serve(app).await).unwrap();

        match feed.fetch().await {
            Err(FeedError::Status { status, .. }) => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let app = Router::new().route(AIRCRAFT_PATH, get(|| async { "{\"now\": " }));
        let feed = HttpFeed::new(&serve(app).await).unwrap();

        assert!(matches!(feed.fetch().await, Err(FeedError::Decode(_))));
    }

    #[tokio::test]
    async fn reachability_fails_when_nothing_listens() {
        // Bind then drop to get a port that is very likely closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let feed = HttpFeed::new(&format!("http://{}", addr)).unwrap();
        assert!(feed.check_reachable(Duration::from_secs(2)).await.is_err());
    }
}
