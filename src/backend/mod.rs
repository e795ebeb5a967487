//! Backend module for tubechat
//!
//! This module contains the remote-backend abstraction and the HTTP
//! implementation used to reach the video inference service.

pub mod client;

pub use client::{
    AskResponse, HttpBackend, IngestResponse, SummaryProbe, VideoBackend,
};
