// Stateless command helpers that are not part of a conversation flow.

pub mod help;
