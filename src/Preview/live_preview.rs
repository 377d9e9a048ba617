use crate::Preview::editor::MathEditor;
use crate::Preview::mode_classifier::{Mode, classify};
use log::debug;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static INFORMAL_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*(?:>|\\gt)\s*").unwrap());

/// Replaces informal arrows (`->`, `-\gt`) by the canonical `\rightarrow` command
pub fn normalize_arrow(text: &str) -> Cow<'_, str> {
    INFORMAL_ARROW.replace_all(text, "\\rightarrow ")
}

/// One outgoing `/live_preview` request
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRequest {
    pub token: u64,
    pub mode: Mode,
    pub latex: String,
}

/// Issues one request per edit and remembers the latest token. No debouncing:
/// answers to fast edits may come back in any order, and only the answer to the
/// latest token is allowed through.
#[derive(Debug, Clone, Default)]
pub struct LivePreviewDispatcher {
    latest: u64,
}

impl LivePreviewDispatcher {
    pub fn new() -> Self {
        Self { latest: 0 }
    }

    pub fn on_edit<E: MathEditor + ?Sized>(&mut self, editor: &mut E) -> PreviewRequest {
        let text = editor.latex();
        let normalized = normalize_arrow(&text).into_owned();
        if normalized != text {
            // the user sees the canonical form
            editor.set_latex(&normalized);
        }
        self.latest += 1;
        let request = PreviewRequest {
            token: self.latest,
            mode: classify(&normalized),
            latex: normalized,
        };
        debug!(
            "live preview #{} mode={} latex={:?}",
            request.token, request.mode, request.latex
        );
        request
    }

    pub fn latest_token(&self) -> u64 {
        self.latest
    }

    pub fn accepts(&self, token: u64) -> bool {
        token == self.latest
    }
}
