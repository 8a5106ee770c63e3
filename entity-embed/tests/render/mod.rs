//! Rendering of embeds in stored field values

mod concurrency;
mod filter;
