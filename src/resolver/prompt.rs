//! Instruction sent to the search service.

use super::platform::Platform;

/// Build the resolution prompt for `input_url`.
///
/// Asks for labeled `Type:`/`Title:`/`Artist:` lines and one line per
/// platform, which is the shape the extractors read.
pub fn build_prompt(input_url: &str) -> String {
    let platforms: String = Platform::ALL
        .iter()
        .map(|p| format!("   - {} ({})\n", p.display_name(), p.canonical_host()))
        .collect();
    let link_lines: String = Platform::ALL
        .iter()
        .map(|p| format!("- {}: [URL]\n", p.display_name()))
        .collect();

    format!(
        "I need to find universal streaming links for a piece of music.\n\
         Original Link: {input_url}\n\
         \n\
         TASK:\n\
         1. Identify whether the link is a track, album or artist, and its Title and Artist.\n\
         2. Use Google Search to find the OFFICIAL direct links for this exact item on:\n\
         {platforms}\
         \n\
         RESPONSE FORMAT:\n\
         Type: [track|album|artist]\n\
         Title: [Name]\n\
         Artist: [Name]\n\
         Links:\n\
         {link_lines}\
         \n\
         IMPORTANT:\n\
         - Only return direct URLs to the item, never search result pages.\n\
         - Ensure URLs are fully qualified.\n\
         - Write N/A for anything you could not find.\n"
    )
}
