pub mod health;
pub mod mcp;
pub mod tts;
pub mod ws;
