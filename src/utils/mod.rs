pub mod file;
pub mod text;
pub mod time;

pub use file::write_atomically;
pub use text::{display_width, pad_left, pad_right};
pub use time::{current_human_timestamp, iso_timestamp};
