//! Backend for the PocketWriter authoring app.
//!
//! Articles and layout templates are stored in SQLite and exposed as JSON
//! CRUD endpoints; images are uploaded to a local directory and served back
//! under `/uploads/`.
//!
//! Layering, bottom up: [`storage`] → [`service`] → [`api`].

pub mod api;
pub mod config;
pub mod service;
pub mod storage;
pub mod uploads;
