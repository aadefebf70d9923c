pub mod builder;
pub mod cache;
pub mod catalog;
pub mod client;
pub mod errors;
pub mod rank;
pub mod session;
pub mod transform;

pub use builder::*;
pub use catalog::*;
pub use client::*;
pub use errors::*;
pub use session::*;
pub use transform::*;

pub mod prelude {
    pub use crate::builder::O2tvBuilder;
    pub use crate::catalog::{CatalogEntry, first_num, parse_listing, trailing_num};
    pub use crate::client::CatalogClient;
    pub use crate::errors::{O2tvError, Result};
    pub use crate::rank::rank;
    pub use crate::session::SearchSession;
    pub use crate::transform::{
        DownloadCandidate, MIRROR_HOSTS, MirrorHost, REPO_LABELS, SeriesOverrides,
        TransformContext, VideoFormat,
    };
}
