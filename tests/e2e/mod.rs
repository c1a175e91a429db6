mod code_panel;
mod generation;
mod rendering;
