//! Domain values: input intents and the character layout tables.

pub mod input;
pub mod layout;
