//! Standalone HTML page embedding the rendered graph.
//!
//! The page pairs the image with the raw `cmapx` map text the layout tool
//! produced. The map declares `<map name="dependencies">`, matching the
//! graph name in the DOT source, so the image references `#dependencies`.

/// Build the report page for a rendered graph.
///
/// `image` is the file name the page references (the page is written next
/// to the image). When `map` is given, its text is embedded verbatim and
/// the image becomes clickable.
pub fn report_page(title: &str, image: &str, map: Option<&str>) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    page.push_str("  <meta charset=\"utf-8\">\n");
    page.push_str(&format!("  <title>{}</title>\n", escape(title)));
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("  <h1>{}</h1>\n", escape(title)));
    if map.is_some() {
        page.push_str(&format!(
            "  <img src=\"{}\" usemap=\"#dependencies\" border=\"0\">\n",
            escape(image)
        ));
    } else {
        page.push_str(&format!("  <img src=\"{}\" border=\"0\">\n", escape(image)));
    }
    if let Some(map) = map {
        page.push_str(map);
        if !map.ends_with('\n') {
            page.push('\n');
        }
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
