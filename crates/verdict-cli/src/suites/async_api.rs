//! HTTP client over a scripted transport

use super::Outcome;
use crate::demo::http::{ApiClient, MockFetch, Response};
use serde_json::json;
use std::time::Duration;
use verdict_runtime::prelude::*;

/// Client timeout for the timeout test; the scripted delay is well past it.
const SHORT_TIMEOUT: Duration = Duration::from_millis(50);
const SLOW_RESPONSE: Duration = Duration::from_millis(200);

pub(super) fn register(runner: &mut TestRunner) {
    let fetch = MockFetch::new();

    runner.describe("Async API Client", |s| {
        let f = fetch.clone();
        s.before_each(move || -> Outcome {
            f.reset();
            Ok(())
        });

        let f = fetch.clone();
        s.it_async("should handle successful GET requests", move || {
            let fetch = f.clone();
            async move {
                let data = json!({"id": 1, "name": "Test"});
                fetch.mock_response("/api/users/1", Response::new(200, data.clone()));

                let result = ApiClient::new(fetch).get("/users/1").await.or_raise()?;
                expect(result).to_equal(data)?;
                Outcome::Ok(())
            }
        });

        let f = fetch.clone();
        s.it_async("should handle HTTP errors", move || {
            let fetch = f.clone();
            async move {
                fetch.mock_response("/api/users/999", Response::new(404, "Not Found"));

                match ApiClient::new(fetch).get("/users/999").await {
                    Ok(_) => Err(TestError::error("Should have thrown an error")),
                    Err(err) => Ok(expect(err.to_string()).to_contain("HTTP 404")?),
                }
            }
        });

        let f = fetch.clone();
        s.it_async("should handle POST requests", move || {
            let fetch = f.clone();
            async move {
                let new_user = json!({"name": "New User", "email": "new@example.com"});
                let created = json!({"id": 123, "name": "New User", "email": "new@example.com"});
                fetch.mock_response("/api/users", Response::new(201, created.clone()));

                let result = ApiClient::new(fetch.clone())
                    .post("/users", new_user.clone())
                    .await
                    .or_raise()?;
                expect(result).to_equal(created)?;

                let sent = fetch.requests().pop().and_then(|r| r.body);
                expect(sent).to_equal(new_user)?;
                Outcome::Ok(())
            }
        });

        let f = fetch.clone();
        s.it_async("should handle network timeouts", move || {
            let fetch = f.clone();
            async move {
                fetch.mock_delay(SLOW_RESPONSE);
                let client = ApiClient::new(fetch).with_timeout(SHORT_TIMEOUT);

                match client.get("/users/1").await {
                    Ok(_) => Err(TestError::error("Should have thrown a timeout error")),
                    Err(err) => Ok(expect(err.to_string()).to_be("Request timeout")?),
                }
            }
        });

        let f = fetch.clone();
        s.it_async("should report network failures", move || {
            let fetch = f.clone();
            async move {
                fetch.mock_failure(true);
                let err = ApiClient::new(fetch)
                    .get("/users/1")
                    .await
                    .err()
                    .map(|e| e.to_string());
                expect(err).to_be("Network error")?;
                Outcome::Ok(())
            }
        });
    });
}
