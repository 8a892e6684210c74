mod dispatcher;
mod matcher;
mod merger;
mod upstream_resolver;

pub use dispatcher::{Dispatcher, Route};
pub use matcher::Matcher;
pub use merger::{merge, MergeSource};
pub use upstream_resolver::UpstreamResolver;
