//! Version command.

use crate::style::banner::print_version_banner;

pub fn run() {
    print_version_banner(env!("CARGO_PKG_VERSION"));
}
