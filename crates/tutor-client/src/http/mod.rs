mod client;

pub use client::HttpTutorClient;
