//! Version banner.

use super::colors::SemanticStyle;

/// Prints the version banner.
pub fn print_version_banner(version: &str) {
    println!();
    println!("  {} {}", "querylens".header(), format!("v{version}").muted());
    println!("  {}", "Divergent SELECT parameter detection".muted());
    println!();
}
