//! Client abstraction over the remote media storage/splicing service.

mod cloudinary;
mod types;

pub use cloudinary::CloudinaryClient;
pub use types::{DeleteOutcome, MediaClient, MediaClientError, RemoteAsset, VideoUpload};
