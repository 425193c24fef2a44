// HTTP-level tests for the Gemini generation client

#[cfg(test)]
mod tests {
    use linkedin_pilot::llm::gemini::GeminiClient;
    use linkedin_pilot::llm::TextGenerator;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key".to_string(), "gemini-1.5-flash", 5)
            .unwrap()
            .with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn test_generates_text_from_a_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "say hi" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "hi there" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).generate("say hi").await.unwrap();
        assert_eq!(text.as_deref(), Some("hi there"));
    }

    #[tokio::test]
    async fn test_empty_candidates_mean_no_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let text = client(&server).generate("anything").await.unwrap();
        assert_eq!(text, None);
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string(r#"{"error":"rate limited"}"#))
            .mount(&server)
            .await;

        let error = client(&server).generate("anything").await.unwrap_err();
        let message = error.to_string();
        assert!(message.contains("429"), "got: {message}");
        assert!(message.contains("rate limited"), "got: {message}");
    }

    #[tokio::test]
    async fn test_preflight_hits_the_generate_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).preflight().await.unwrap();
    }
}
