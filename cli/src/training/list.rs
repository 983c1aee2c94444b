//! # Chatterm Built-in Conversation
//!
//! File: cli/src/training/list.rs
//!
//! ## Overview
//!
//! The built-in conversation used by the `list` strategy and as the corpus
//! fallback.

use crate::engine::TrainingExample;

/// Eleven scripted turns. The bot's name is substituted into its introduction.
pub fn builtin_conversation(bot_name: &str) -> TrainingExample {
    TrainingExample::new([
        "Good morning! How are you doing?".to_string(),
        "I am doing very well, thank you for asking.".to_string(),
        "You're welcome.".to_string(),
        "Do you like hats?".to_string(),
        "Sometimes. What kind of hats do you like?".to_string(),
        "I like caps.".to_string(),
        "Caps are cool! 😄".to_string(),
        "What is your name?".to_string(),
        format!("My name is {}.", bot_name),
        "Bye".to_string(),
        "Goodbye! Have a great day!".to_string(),
    ])
}
