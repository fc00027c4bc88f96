//! Records every freshly started app shows before the first interaction.

/// `(name, completed)` pairs, in display order
pub const DEFAULT_TODOS: [(&str, bool); 3] = [
    ("Eating", true),
    ("Sleeping", true),
    ("Learning", false),
];
