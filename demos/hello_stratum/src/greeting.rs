//! Rendering greetings from a resolved configuration.

use crate::config::{HelloConfig, Style};

/// One line per repetition, cycling through the salutations.
#[must_use]
pub fn lines(config: &HelloConfig) -> Vec<String> {
    let salutations: Vec<&str> = if config.salutations.is_empty() {
        vec!["Hello"]
    } else {
        config.salutations.iter().map(String::as_str).collect()
    };
    salutations
        .iter()
        .cycle()
        .take(usize::from(config.repeat))
        .map(|salutation| {
            let line = format!(
                "{salutation}, {}{}",
                config.name, config.delivery.punctuation
            );
            match config.style {
                Style::Plain => line,
                Style::Shout => line.to_uppercase(),
            }
        })
        .collect()
}
