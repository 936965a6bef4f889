/// Formats each payload as an SSE `data:` event, in the framing the Feeling Interpreter API emits.
pub fn sse_body(payloads: &[&str]) -> String {
    return payloads
        .iter()
        .map(|payload| {
            return format!("data: {payload}\n\n");
        })
        .collect::<Vec<String>>()
        .join("");
}

/// A full successful session, as streamed by the backend for a single pass through its graph.
pub fn happy_path_fixture() -> String {
    return sse_body(&[
        r#"{"status": "interpreting", "message": "🤔 Analyzing your feeling..."}"#,
        r#"{"status": "encouraging", "message": "💪 Generating encouragement..."}"#,
        r#"{"status": "judging", "message": "⚖️ Evaluating quality..."}"#,
        r#"{"status": "complete", "message": "✅ Done!", "data": {"output": "You've got this!"}}"#,
    ]);
}

/// A session the backend gave up on part way through.
pub fn backend_error_fixture() -> String {
    return sse_body(&[
        r#"{"status": "interpreting", "message": "🤔 Analyzing your feeling..."}"#,
        r#"{"status": "error", "message": "❌ Error: rate limited"}"#,
    ]);
}
