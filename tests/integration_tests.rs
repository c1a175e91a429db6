// Integration tests - the panel driven through its public API, the way the
// binary drives it: key events in, rendered screen out

mod common;
mod e2e;
