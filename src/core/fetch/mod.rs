mod client;

pub use client::{DownloadProgress, FileFetcher, ProgressSink};
