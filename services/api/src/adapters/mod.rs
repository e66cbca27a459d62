pub mod completion_llm;

pub use completion_llm::OpenAiCompletionAdapter;
