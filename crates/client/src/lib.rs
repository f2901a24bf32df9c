//! Client code for buildll.
//!
//! This crate provides the cached content client, the HTTP transport it runs
//! on, the live-edit channel, and the content session used by page code.

pub mod content;
pub mod live;
pub mod session;
pub mod transport;

pub use content::BuildllClient;
pub use live::{EditChannel, EditEvent, EditSubscription};
pub use session::{ContentSession, SectionView, merge_defaults};
pub use transport::{ApiRequest, ApiResponse, Auth, HttpTransport, Method, Transport};

pub use buildll_core::{BatchContent, ClientConfig, ContentResponse, ContentUpdate, Error};
