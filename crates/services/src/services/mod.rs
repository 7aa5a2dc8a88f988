pub mod activity_feed;
pub mod audience;
pub mod comment_feed;
pub mod comment_posting;
pub mod comment_threads;
pub mod feed_store;
pub mod unified_feed;

#[cfg(test)]
pub(crate) mod test_support;
