//! Unit tests mirroring the `src/` layout

mod algorithm;
