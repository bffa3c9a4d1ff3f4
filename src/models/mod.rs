pub mod user;
pub mod alert;
pub mod chat_message;
pub mod benchmark;

pub use user::{User, UserProfile};
pub use alert::{AlertCondition, PriceAlert, PriceAlertView};
pub use chat_message::{ChatMessage, ChatMessageView, ChatRole};
pub use benchmark::{BenchmarkView, PortfolioBenchmark};
