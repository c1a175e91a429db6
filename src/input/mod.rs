//! Input handling: high-level panel actions and the key bindings that produce them

#[cfg(feature = "runtime")]
pub mod keybindings;

/// Context in which a key binding is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    /// The file tree has focus
    FileTree,
    /// The code viewer has focus
    CodeViewer,
    /// The prompt line is being edited
    Prompt,
    /// The panel is hidden; only global bindings apply
    Closed,
}

impl KeyContext {
    /// Check if a context should allow text input
    pub fn allows_text_input(&self) -> bool {
        matches!(self, Self::Prompt)
    }
}

/// High-level actions that can be performed on the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Panel
    TogglePanel,
    FocusNext,
    CopySelection,
    DiscardArtifacts,
    OpenPrompt,
    Quit,

    // File tree
    FileTreeUp,
    FileTreeDown,
    FileTreePageUp,
    FileTreePageDown,
    FileTreeFirst,
    FileTreeLast,
    FileTreeExpand,
    FileTreeCollapse,
    FileTreeActivate,

    // Code viewer
    ViewerScrollUp,
    ViewerScrollDown,
    ViewerPageUp,
    ViewerPageDown,
    ViewerTop,
    ViewerBottom,

    // Prompt
    PromptInsert(char),
    PromptBackspace,
    PromptLeft,
    PromptRight,
    PromptSubmit,
    PromptCancel,
}
