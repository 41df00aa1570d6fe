// End-to-end tests for the Voice MCP Backend API
//
// Each test gets its own application bound to an ephemeral port, with both
// TTS providers pointed at per-test wiremock servers. No test reaches the
// real provider endpoints, and tests run in parallel.

mod helpers;
mod test_mcp;
mod test_tts;
