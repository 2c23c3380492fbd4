//! Helpers for application calls: box storage keys and command line
//! arguments.
mod args;
mod box_key;

pub use self::{
  args::AppCallBytes,
  box_key::{make_box_key, split_box_key, BOX_NAME_INDEX, BOX_PREFIX},
};
