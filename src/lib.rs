//! Brailler library
//!
//! A six-key Perkins-style braille input surface: a cell model, a grid and
//! cursor engine driven by chorded dot keys, keyboard translation, adaptive
//! on-screen key calibration, a terminal front end and an HTTP API.

pub mod calibration;
pub mod config;
pub mod constants;
pub mod engine;
pub mod export;
pub mod input;
pub mod models;
#[cfg(feature = "ratatui")]
pub mod tui;
#[cfg(feature = "web")]
pub mod web;
