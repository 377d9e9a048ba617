/// What the client needs from a math-input widget: hold and emit its latex text,
/// accept insertion commands, focus and select.
pub trait MathEditor {
    fn latex(&self) -> String;
    fn set_latex(&mut self, latex: &str);
    /// insert a command (`\rightarrow`, `^`, `_` ...) at the cursor
    fn cmd(&mut self, command: &str);
    fn focus(&mut self);
    fn blur(&mut self);
    fn select(&mut self);
    fn is_focused(&self) -> bool;
}

/// In-memory editor with the cursor always at the end of the text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathField {
    text: String,
    focused: bool,
    selected: bool,
}

impl MathField {
    pub fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            focused: false,
            selected: false,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

impl MathEditor for MathField {
    fn latex(&self) -> String {
        self.text.clone()
    }

    fn set_latex(&mut self, latex: &str) {
        self.text = latex.to_string();
        self.selected = false;
    }

    fn cmd(&mut self, command: &str) {
        if self.selected {
            // typing over a selection replaces it
            self.text.clear();
            self.selected = false;
        }
        self.text.push_str(command);
        // commands are words; keep them apart from the next symbol
        if command.starts_with('\\') {
            self.text.push(' ');
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
        self.selected = false;
    }

    fn select(&mut self) {
        self.selected = true;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

/// Toolbar buttons next to the expression editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorButton {
    RightArrow,
    Superscript,
    Subscript,
    LeftParenthesis,
    RightParenthesis,
    Plus,
    Colon,
    Semicolon,
}

impl EditorButton {
    pub const ALL: [EditorButton; 8] = [
        EditorButton::RightArrow,
        EditorButton::Superscript,
        EditorButton::Subscript,
        EditorButton::LeftParenthesis,
        EditorButton::RightParenthesis,
        EditorButton::Plus,
        EditorButton::Colon,
        EditorButton::Semicolon,
    ];

    pub fn command(&self) -> &'static str {
        match self {
            EditorButton::RightArrow => "\\rightarrow",
            EditorButton::Superscript => "^",
            EditorButton::Subscript => "_",
            EditorButton::LeftParenthesis => "(",
            EditorButton::RightParenthesis => ")",
            EditorButton::Plus => "+",
            EditorButton::Colon => ":",
            EditorButton::Semicolon => ";",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditorButton::RightArrow => "→",
            EditorButton::Superscript => "x^",
            EditorButton::Subscript => "x_",
            EditorButton::LeftParenthesis => "(",
            EditorButton::RightParenthesis => ")",
            EditorButton::Plus => "+",
            EditorButton::Colon => ":",
            EditorButton::Semicolon => ";",
        }
    }
}
