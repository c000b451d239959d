mod utils;

pub use utils::{display_width, truncate_to_width};
