// Outbound text generation used for narrative summaries.

pub mod openai;
pub mod traits;

pub use openai::OpenAiGenerator;
pub use traits::TextGenerator;
