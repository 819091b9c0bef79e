//! Configuration for the parser and renderer (spec.md §6.2).

/// Umbrella options struct threaded through parsing and rendering.
///
/// This crate implements plain CommonMark only, so there is no
/// `Extension`/`Plugins` surface here the way the teacher's does — just the
/// one flag spec.md actually calls for.
#[derive(Default, Debug, Clone, Copy)]
pub struct Options {
    /// Render-time options.
    pub render: RenderOptions,
}

/// Options that affect HTML rendering only.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Mirrors the CLI's `--unsafe` flag. Raw HTML blocks/inlines and link
    /// destinations are always passed through unchanged regardless of this
    /// flag's value (see spec.md §6.2: `--unsafe` is "accepted for
    /// compatibility", not a gate on a safe-mode default); it exists so the
    /// CLI surface matches cmark-style tools that do have such a flag.
    pub unsafe_: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { unsafe_: false }
    }
}
