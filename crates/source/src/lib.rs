#![doc = include_str!("../README.md")]

pub mod directory;
pub mod error;
pub mod excluding;
pub mod image;
pub mod index;
pub mod location;
pub mod metadata;
pub mod mime;
pub mod mock;
pub mod paths;
pub mod resolver;
pub mod single_file;
pub mod source;
pub mod stream;

pub use error::SourceError;
pub use excluding::{ExcludeFn, ExcludingResolver, exclude_globs};
pub use image::Layer;
pub use index::{FileIndex, FileIndexBuilder, IndexEntry, IndexResolver};
pub use location::{Coordinates, FileRef, Location, LocationSet};
pub use metadata::{FileMetadata, FileType};
pub use mock::MockResolver;
pub use resolver::{FileContents, Resolver, read_contents, read_to_string};
pub use source::{ImageMetadata, Scheme, Source, SourceDescription};
pub use stream::{LocationSender, LocationStream};
