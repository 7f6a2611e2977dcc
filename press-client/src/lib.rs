//! Client library for the press content-management backend
//!
//! Provides the pieces the admin console is built on:
//! - a JSON request helper with uniform error extraction
//! - typed endpoints for posts, chat, Instagram imports and cache administration
//! - a progress session tracker over server-sent events
//! - an in-memory image URL cache with batched pre-fetch

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod image_cache;
pub mod mock;
pub mod models;
pub mod progress;

pub use api::PressClient;
pub use config::Config;
pub use error::{PressError, Result};
pub use http::{ApiClient, RequestOptions};
pub use image_cache::{ImageCache, ImageCacheBackend, PrefetchReport, Resolution};
pub use mock::MockImageBackend;
pub use progress::{ProgressCallbacks, ProgressData, ProgressEvent, ProgressFailure, ProgressTracker};
