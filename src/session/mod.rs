//! Session module - per-file pipeline state

mod controller;

pub use controller::{FileSession, SessionController, UploadedFile};
