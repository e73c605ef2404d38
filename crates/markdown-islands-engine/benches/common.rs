/// Generate a raw HTML island with `sections` repeated Markdown sections.
pub fn generate_island_content(sections: usize) -> String {
    let mut content = String::from("<div markdown=\"1\">\n");
    for i in 0..sections {
        content.push_str(&format!(
            "## Section {i}\n\nParagraph text for section {i}.\n\n<p markdown=\"1\">span content {i}</p>\n<!-- marker {i} -->\n"
        ));
    }
    content.push_str("</div>\n");
    content
}
