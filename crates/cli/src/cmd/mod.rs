mod hash;
mod hash_rename;
mod page_tmpl;
mod watch;

pub use hash::cmd_hash;
pub use hash_rename::cmd_hash_rename;
pub use page_tmpl::cmd_page_tmpl;
pub use watch::cmd_watch;
