//! Shared logic for OpenAI-compatible transcription APIs.

mod openai_compatible;

pub(crate) use openai_compatible::openai_compatible_transcribe;
