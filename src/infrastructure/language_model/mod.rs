//! Language model adapters

mod openai;

pub use openai::{OpenAiBlockingLanguageModel, OpenAiLanguageModel, OpenAiSettings};
